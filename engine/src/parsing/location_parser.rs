//! Parser for the location-node index payload.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::core::domain::LocationNode;
use crate::parsing::graph_parser::deserialize_node_ref;

/// Raw JSON structure for a location node
#[derive(Debug, Deserialize)]
struct RawLocationNode {
    #[serde(deserialize_with = "deserialize_node_ref")]
    id: String,
    #[serde(rename = "Name")]
    name: Option<String>,
}

/// Container for the location index structure
#[derive(Debug, Deserialize)]
struct RawLocationIndex {
    nodes: Vec<RawLocationNode>,
}

/// Parse the location-node index from a JSON string.
///
/// Nodes without a name are dropped: they can never resolve to a
/// geography feature.
pub fn parse_locations_str(json: &str) -> Result<Vec<LocationNode>> {
    let raw: RawLocationIndex =
        serde_json::from_str(json).context("Failed to parse location-node payload")?;

    Ok(raw
        .nodes
        .into_iter()
        .filter_map(|n| {
            n.name.map(|name| LocationNode { id: n.id, name })
        })
        .collect())
}
