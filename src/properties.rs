//! The network properties structure returned by the interactive netwulf
//! visualization: per-node position, size and color, per-link width, the view
//! bounds and the uniform link/node stroke styling.

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

static HEX_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").unwrap());
static FUNC_COLOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:rgb|rgba|hsl|hsla)\(\s*[0-9.%]+(?:\s*,\s*[0-9.%]+){2,3}\s*\)$").unwrap()
});
static NAMED_COLOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z]+$").unwrap());

/// Node identifier as it travels through the JSON exchange. Integer and
/// string ids are distinct keys.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeId {
    Int(i64),
    Str(String),
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Int(value) => write!(f, "{value}"),
            NodeId::Str(value) => f.write_str(value),
        }
    }
}

impl From<i64> for NodeId {
    fn from(value: i64) -> Self {
        NodeId::Int(value)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        NodeId::Str(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        NodeId::Str(value)
    }
}

/// A color value in a form both SVG and the producing tool understand.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(String);

impl Color {
    pub fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        if HEX_COLOR_RE.is_match(trimmed)
            || FUNC_COLOR_RE.is_match(trimmed)
            || NAMED_COLOR_RE.is_match(trimmed)
        {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(Error::malformed(format!("invalid color `{value}`")))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Color::parse(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeProperties {
    pub id: NodeId,
    pub pos: [f64; 2],
    pub radius: f64,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkProperties {
    pub link: [NodeId; 2],
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkProperties {
    pub nodes: Vec<NodeProperties>,
    pub links: Vec<LinkProperties>,
    pub xlim: [f64; 2],
    pub ylim: [f64; 2],
    pub link_alpha: f64,
    pub link_color: Color,
    pub node_stroke_width: f64,
    pub node_stroke_color: Color,
}

impl NetworkProperties {
    /// Decodes and validates the JSON payload handed back by the interactive
    /// visualization.
    pub fn from_json_str(input: &str) -> Result<Self> {
        let props: Self = serde_json::from_str(input)?;
        props.validate()?;
        Ok(props)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let props: Self = serde_json::from_value(value)?;
        props.validate()?;
        Ok(props)
    }

    /// Checks field shapes. Link endpoints are not checked here; the renderer
    /// reports them as missing node references.
    pub fn validate(&self) -> Result<()> {
        for (idx, node) in self.nodes.iter().enumerate() {
            if !node.pos.iter().all(|v| v.is_finite()) {
                return Err(Error::malformed(format!(
                    "nodes[{idx}].pos must be finite, got {:?}",
                    node.pos
                )));
            }
            check_size(node.radius, || format!("nodes[{idx}].radius"))?;
        }
        for (idx, link) in self.links.iter().enumerate() {
            check_size(link.width, || format!("links[{idx}].width"))?;
        }
        check_limits(self.xlim, "xlim")?;
        check_limits(self.ylim, "ylim")?;
        check_size(self.node_stroke_width, || "nodeStrokeWidth".to_string())?;
        if !(0.0..=1.0).contains(&self.link_alpha) {
            return Err(Error::malformed(format!(
                "linkAlpha must lie in [0, 1], got {}",
                self.link_alpha
            )));
        }
        Ok(())
    }

    /// Width of the visible x range in data units.
    pub fn x_range(&self) -> f64 {
        (self.xlim[1] - self.xlim[0]).abs()
    }

    /// Position lookup by node id. Later duplicates overwrite earlier ones.
    pub fn positions(&self) -> HashMap<&NodeId, [f64; 2]> {
        self.nodes.iter().map(|node| (&node.id, node.pos)).collect()
    }
}

fn check_size(value: f64, field: impl FnOnce() -> String) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::malformed(format!(
            "{} must be finite and non-negative, got {value}",
            field()
        )))
    }
}

fn check_limits(limits: [f64; 2], field: &str) -> Result<()> {
    if !limits.iter().all(|v| v.is_finite()) {
        return Err(Error::malformed(format!("{field} must be finite, got {limits:?}")));
    }
    if limits[0] == limits[1] {
        return Err(Error::malformed(format!(
            "{field} must span a non-empty range, got {limits:?}"
        )));
    }
    Ok(())
}
