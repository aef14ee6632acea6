use crate::properties::NodeId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub type Attributes = Map<String, Value>;

/// Graph side of position binding: a per-node attribute store keyed by node id.
pub trait NodeAttributeStore {
    fn contains_node(&self, id: &NodeId) -> bool;

    /// Sets attribute `name` on every node named in `values`. Ids the store
    /// does not know are skipped.
    fn set_node_attributes(&mut self, values: &BTreeMap<NodeId, f64>, name: &str);
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub attributes: Attributes,
}

/// A node-attributed graph as exchanged with the interactive visualization.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    pub directed: bool,
    pub multigraph: bool,
    pub graph: Attributes,
    pub nodes: BTreeMap<NodeId, Attributes>,
    pub edges: Vec<Edge>,
}

impl Network {
    pub fn new() -> Self {
        Self {
            directed: false,
            multigraph: false,
            graph: Attributes::new(),
            nodes: BTreeMap::new(),
            edges: Vec::new(),
        }
    }

    pub fn ensure_node(&mut self, id: impl Into<NodeId>) -> &mut Attributes {
        self.nodes.entry(id.into()).or_default()
    }

    pub fn add_edge(&mut self, source: impl Into<NodeId>, target: impl Into<NodeId>) {
        let source = source.into();
        let target = target.into();
        self.ensure_node(source.clone());
        self.ensure_node(target.clone());
        self.edges.push(Edge {
            source,
            target,
            attributes: Attributes::new(),
        });
    }

    pub fn node_attribute(&self, id: &NodeId, name: &str) -> Option<&Value> {
        self.nodes.get(id).and_then(|attrs| attrs.get(name))
    }

    /// Reads networkx-style node-link JSON. Keys other than `id` on nodes and
    /// `source`/`target` on links are kept as attributes.
    pub fn from_node_link_json(input: &str) -> serde_json::Result<Self> {
        let data: NodeLinkData = serde_json::from_str(input)?;
        let mut network = Network {
            directed: data.directed,
            multigraph: data.multigraph,
            graph: data.graph,
            ..Network::new()
        };
        for node in data.nodes {
            network.ensure_node(node.id).extend(node.attributes);
        }
        for link in data.links {
            network.ensure_node(link.source.clone());
            network.ensure_node(link.target.clone());
            network.edges.push(Edge {
                source: link.source,
                target: link.target,
                attributes: link.attributes,
            });
        }
        Ok(network)
    }

    pub fn to_node_link_json(&self) -> serde_json::Result<String> {
        let data = NodeLinkData {
            directed: self.directed,
            multigraph: self.multigraph,
            graph: self.graph.clone(),
            nodes: self
                .nodes
                .iter()
                .map(|(id, attributes)| NodeLinkNode {
                    id: id.clone(),
                    attributes: attributes.clone(),
                })
                .collect(),
            links: self
                .edges
                .iter()
                .map(|edge| NodeLinkEdge {
                    source: edge.source.clone(),
                    target: edge.target.clone(),
                    attributes: edge.attributes.clone(),
                })
                .collect(),
        };
        serde_json::to_string_pretty(&data)
    }
}

impl Default for Network {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeAttributeStore for Network {
    fn contains_node(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    fn set_node_attributes(&mut self, values: &BTreeMap<NodeId, f64>, name: &str) {
        for (id, value) in values {
            if let Some(attrs) = self.nodes.get_mut(id) {
                attrs.insert(name.to_string(), Value::from(*value));
            }
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct NodeLinkData {
    #[serde(default)]
    directed: bool,
    #[serde(default)]
    multigraph: bool,
    #[serde(default)]
    graph: Attributes,
    nodes: Vec<NodeLinkNode>,
    #[serde(default, alias = "edges")]
    links: Vec<NodeLinkEdge>,
}

#[derive(Debug, Serialize, Deserialize)]
struct NodeLinkNode {
    id: NodeId,
    #[serde(flatten)]
    attributes: Attributes,
}

#[derive(Debug, Serialize, Deserialize)]
struct NodeLinkEdge {
    source: NodeId,
    target: NodeId,
    #[serde(flatten)]
    attributes: Attributes,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_node_link_json() {
        let input = r#"{
            "directed": false,
            "multigraph": false,
            "graph": {"name": "toy"},
            "nodes": [{"id": 0, "group": 1}, {"id": "a"}],
            "links": [{"source": 0, "target": "a", "weight": 2.5}, {"source": "a", "target": "b"}]
        }"#;
        let network = Network::from_node_link_json(input).unwrap();
        assert_eq!(network.nodes.len(), 3);
        assert_eq!(network.edges.len(), 2);
        assert_eq!(
            network.node_attribute(&NodeId::Int(0), "group"),
            Some(&Value::from(1))
        );
        assert_eq!(network.edges[0].attributes.get("weight"), Some(&Value::from(2.5)));
        assert!(network.contains_node(&NodeId::from("b")));
    }

    #[test]
    fn node_link_output_reads_back() {
        let mut network = Network::new();
        network.add_edge(1i64, 2i64);
        network
            .ensure_node(3i64)
            .insert("label".to_string(), Value::from("three"));
        let json = network.to_node_link_json().unwrap();
        assert_eq!(Network::from_node_link_json(&json).unwrap(), network);
    }

    #[test]
    fn bulk_set_skips_unknown_ids() {
        let mut network = Network::new();
        network.ensure_node("a");
        let values = BTreeMap::from([(NodeId::from("a"), 1.0), (NodeId::from("zzz"), 2.0)]);
        network.set_node_attributes(&values, "x");
        assert_eq!(network.node_attribute(&NodeId::from("a"), "x"), Some(&Value::from(1.0)));
        assert!(!network.contains_node(&NodeId::from("zzz")));
    }
}
