//! Parser for the vessel/event graph payload.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;

use crate::core::domain::{CargoTransaction, PingEvent, Vessel};

/// Link type of transponder ping events.
pub const TRANSPONDER_PING_TYPE: &str = "Event.TransportEvent.TransponderPing";
/// Link type of cargo transaction events.
pub const TRANSACTION_TYPE: &str = "Event.Transaction";
/// Node type prefix of vessel entities.
pub const VESSEL_TYPE_PREFIX: &str = "Entity.Vessel";
/// Node type prefix of cargo document entities.
pub const DOCUMENT_TYPE_PREFIX: &str = "Entity.Document";

/// Custom deserializer that accepts either a string or a number for node
/// and link references.
pub(crate) fn deserialize_node_ref<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Int(i64),
        Float(f64),
    }

    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s,
        StringOrNumber::Int(i) => i.to_string(),
        StringOrNumber::Float(f) => f.to_string(),
    })
}

/// Raw JSON structure for a graph node
#[derive(Debug, Deserialize)]
struct RawNode {
    #[serde(deserialize_with = "deserialize_node_ref")]
    id: String,
    #[serde(rename = "type")]
    node_type: Option<String>,
    name: Option<String>,
    company: Option<String>,
    qty_tons: Option<serde_json::Value>,
}

/// Raw JSON structure for a graph link
#[derive(Debug, Deserialize)]
struct RawLink {
    #[serde(rename = "type")]
    link_type: Option<String>,
    #[serde(deserialize_with = "deserialize_node_ref")]
    source: String,
    #[serde(deserialize_with = "deserialize_node_ref")]
    target: String,
    time: Option<String>,
    date: Option<String>,
}

/// Container for the graph payload structure
#[derive(Debug, Deserialize)]
struct RawGraph {
    nodes: Vec<RawNode>,
    links: Vec<RawLink>,
}

/// Per-record problems tallied while extracting events.
#[derive(Debug, Clone, Default)]
pub struct GraphParseStats {
    pub malformed_ping_dates: usize,
    pub malformed_transaction_dates: usize,
    pub missing_quantities: usize,
}

/// Parsed graph payload: vessel entities plus the two event streams.
#[derive(Debug, Clone)]
pub struct GraphPayload {
    pub vessels: Vec<Vessel>,
    pub pings: Vec<PingEvent>,
    pub transactions: Vec<CargoTransaction>,
    pub stats: GraphParseStats,
}

/// Parse the graph payload from a JSON string.
pub fn parse_graph_str(json: &str) -> Result<GraphPayload> {
    let mut deserializer = serde_json::Deserializer::from_str(json);
    let raw: RawGraph = serde_path_to_error::deserialize(&mut deserializer)
        .context("Failed to parse graph payload")?;

    let mut stats = GraphParseStats::default();

    let vessels: Vec<Vessel> = raw
        .nodes
        .iter()
        .filter(|n| has_type_prefix(n, VESSEL_TYPE_PREFIX))
        .map(|n| Vessel {
            id: n.id.clone(),
            name: n.name.clone().unwrap_or_else(|| n.id.clone()),
            company: n.company.clone().filter(|c| !c.is_empty()),
        })
        .collect();

    // Cargo documents are only consulted through transactions; index their
    // quantities by node id.
    let cargo_quantities: HashMap<&str, Option<f64>> = raw
        .nodes
        .iter()
        .filter(|n| has_type_prefix(n, DOCUMENT_TYPE_PREFIX))
        .map(|n| (n.id.as_str(), numeric_quantity(n.qty_tons.as_ref())))
        .collect();

    let mut pings = Vec::new();
    let mut transactions = Vec::new();

    for link in &raw.links {
        match link.link_type.as_deref() {
            Some(TRANSPONDER_PING_TYPE) => {
                match link.time.as_deref().and_then(parse_event_time) {
                    Some(time) => pings.push(PingEvent {
                        location_id: link.source.clone(),
                        vessel_id: link.target.clone(),
                        time,
                    }),
                    None => stats.malformed_ping_dates += 1,
                }
            }
            Some(TRANSACTION_TYPE) => {
                let date = link
                    .date
                    .as_deref()
                    .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());
                match date {
                    Some(date) => {
                        let quantity = match cargo_quantities.get(link.source.as_str()) {
                            Some(Some(qty)) => *qty,
                            _ => {
                                stats.missing_quantities += 1;
                                0.0
                            }
                        };
                        transactions.push(CargoTransaction {
                            date,
                            quantity_tons: quantity,
                        });
                    }
                    None => stats.malformed_transaction_dates += 1,
                }
            }
            _ => {}
        }
    }

    Ok(GraphPayload {
        vessels,
        pings,
        transactions,
        stats,
    })
}

fn has_type_prefix(node: &RawNode, prefix: &str) -> bool {
    node.node_type
        .as_deref()
        .map(|t| t.starts_with(prefix))
        .unwrap_or(false)
}

/// Reads a numeric field that upstream producers emit as either a number
/// or a numeric string. Unparsable values count as missing.
fn numeric_quantity(value: Option<&serde_json::Value>) -> Option<f64> {
    match value? {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Parse an event timestamp.
///
/// Accepts RFC 3339, `%Y-%m-%dT%H:%M:%S` (with or without fractional
/// seconds), and bare dates, which resolve to midnight UTC.
pub fn parse_event_time(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}
