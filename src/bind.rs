use crate::error::{Error, Result};
use crate::network::NodeAttributeStore;
use crate::properties::{NetworkProperties, NodeId};
use std::collections::BTreeMap;

/// Binds the computed node positions to `network` as node attributes `x` and
/// `y`.
///
/// The layout is validated first and every node id is checked against the
/// store before anything is written, so a malformed layout or an unknown id
/// leaves the network untouched. When an id appears more than
/// once, its last record wins.
pub fn bind_positions<G>(network: &mut G, props: &NetworkProperties) -> Result<()>
where
    G: NodeAttributeStore + ?Sized,
{
    let _span = tracing::debug_span!("bind_positions", nodes = props.nodes.len()).entered();

    props.validate()?;

    let mut x = BTreeMap::new();
    let mut y = BTreeMap::new();
    for node in &props.nodes {
        x.insert(node.id.clone(), node.pos[0]);
        y.insert(node.id.clone(), node.pos[1]);
    }

    if let Some(missing) = x.keys().find(|id| !network.contains_node(id)) {
        tracing::trace!(id = %missing, "position for unknown node");
        return Err(missing_node(missing));
    }

    network.set_node_attributes(&x, "x");
    network.set_node_attributes(&y, "y");
    tracing::debug!(bound = x.len(), "bound node positions");
    Ok(())
}

fn missing_node(id: &NodeId) -> Error {
    Error::MissingNodeReference {
        id: id.clone(),
        context: "network",
    }
}
