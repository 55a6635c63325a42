//! Domain models for vessel movement analysis.
//!
//! This module provides the core data structures that represent the loaded
//! dataset: vessels, transponder pings, geographic zones, and the derived
//! track/suspicion artifacts. Everything here is immutable once the dataset
//! has been assembled; derivations never patch these structures in place.

use chrono::{DateTime, NaiveDate, Utc};
use geo_types::{Geometry, Point};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A geographic coordinate pair in (longitude, latitude) order.
///
/// # Examples
///
/// ```
/// use oceanus_engine::core::domain::GeoPoint;
///
/// let p = GeoPoint::new(-164.5, 39.6);
/// assert_eq!(p.lon, -164.5);
/// assert_eq!(p.lat, 39.6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Converts to a `geo` point for containment tests.
    pub fn to_point(self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }
}

/// A vessel entity from the graph payload.
///
/// The owning company is optional; vessels without one are excluded from
/// all company-keyed aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vessel {
    pub id: String,
    pub name: String,
    pub company: Option<String>,
}

/// A named location from the location-node index.
///
/// Pings reference locations by id; the location's name resolves to a
/// point feature in the geography payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationNode {
    pub id: String,
    pub name: String,
}

/// A geographic zone: polygon or multi-polygon with an optional kind
/// classification. Whether a zone is forbidden is decided by the engine
/// configuration, not stored here.
#[derive(Debug, Clone)]
pub struct Zone {
    pub name: String,
    pub kind: Option<String>,
    pub geometry: Geometry<f64>,
}

/// A transponder ping: a timestamped link from a location to a vessel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PingEvent {
    pub location_id: String,
    pub vessel_id: String,
    pub time: DateTime<Utc>,
}

/// A dated cargo movement, used only for the cargo-volume time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CargoTransaction {
    pub date: NaiveDate,
    pub quantity_tons: f64,
}

/// An ordered run of track points with no over-threshold time gap between
/// consecutive points. A single-point segment carries no polyline but still
/// anchors suspicion data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackSegment {
    pub points: Vec<GeoPoint>,
}

impl TrackSegment {
    /// Returns `true` if the segment has enough points to draw a polyline.
    pub fn has_polyline(&self) -> bool {
        self.points.len() >= 2
    }
}

/// A lapse in transponder reporting between two consecutive pings of the
/// same vessel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapEvent {
    pub from: GeoPoint,
    pub to: GeoPoint,
    pub hours: f64,
}

/// One ping that fell inside at least one forbidden zone.
///
/// `zones` lists every forbidden zone containing the point, in zone
/// iteration order; aggregation counts only the first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuspicionRecord {
    pub vessel_id: String,
    pub vessel_name: String,
    pub zones: Vec<String>,
    pub time: DateTime<Utc>,
}

/// Counters recorded while parsing and assembling the dataset.
///
/// Per-record problems never fail the load; they are tallied here and
/// surfaced through the dataset validator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestStats {
    pub malformed_ping_dates: usize,
    pub malformed_transaction_dates: usize,
    pub missing_quantities: usize,
    pub skipped_features: usize,
}

/// The immutable dataset every derivation reads from.
///
/// Assembled once from the three parsed payloads. Per-vessel ping lists
/// are pre-sorted ascending by timestamp (stable, so equal timestamps keep
/// payload order) and location references are pre-joined to coordinates.
#[derive(Debug, Clone)]
pub struct MovementDataset {
    pub vessels: Vec<Vessel>,
    pub pings: Vec<PingEvent>,
    pub transactions: Vec<CargoTransaction>,
    pub zones: Vec<Zone>,
    pub location_nodes: Vec<LocationNode>,
    pub ingest: IngestStats,

    location_coords: HashMap<String, GeoPoint>,
    pings_by_vessel: HashMap<String, Vec<usize>>,
}

impl MovementDataset {
    /// Joins the parsed payload parts into a queryable dataset.
    ///
    /// `points_by_name` maps geography point-feature names to coordinates;
    /// location nodes whose name has no point feature simply produce no
    /// entry, and pings referencing them are dropped at query time.
    pub fn assemble(
        vessels: Vec<Vessel>,
        pings: Vec<PingEvent>,
        transactions: Vec<CargoTransaction>,
        zones: Vec<Zone>,
        location_nodes: Vec<LocationNode>,
        points_by_name: HashMap<String, GeoPoint>,
        ingest: IngestStats,
    ) -> Self {
        let mut location_coords = HashMap::new();
        for node in &location_nodes {
            if let Some(point) = points_by_name.get(&node.name) {
                location_coords.insert(node.id.clone(), *point);
            }
        }

        let mut pings_by_vessel: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, ping) in pings.iter().enumerate() {
            pings_by_vessel
                .entry(ping.vessel_id.clone())
                .or_default()
                .push(idx);
        }
        for indices in pings_by_vessel.values_mut() {
            indices.sort_by_key(|&i| pings[i].time);
        }

        Self {
            vessels,
            pings,
            transactions,
            zones,
            location_nodes,
            ingest,
            location_coords,
            pings_by_vessel,
        }
    }

    /// Resolves a ping's source location to coordinates.
    ///
    /// Returns `None` when the location id is unknown or its name has no
    /// matching point feature; such pings are excluded from tracking and
    /// aggregation.
    pub fn resolve_location(&self, location_id: &str) -> Option<GeoPoint> {
        self.location_coords.get(location_id).copied()
    }

    /// The vessel's pings in ascending time order.
    pub fn vessel_pings(&self, vessel_id: &str) -> impl Iterator<Item = &PingEvent> {
        self.pings_by_vessel
            .get(vessel_id)
            .into_iter()
            .flatten()
            .map(move |&i| &self.pings[i])
    }

    pub fn vessel_by_id(&self, vessel_id: &str) -> Option<&Vessel> {
        self.vessels.iter().find(|v| v.id == vessel_id)
    }

    /// Distinct company names in first-seen order.
    pub fn companies(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for vessel in &self.vessels {
            if let Some(company) = &vessel.company {
                if !seen.iter().any(|c| c == company) {
                    seen.push(company.clone());
                }
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn ping(location: &str, vessel: &str, time: &str) -> PingEvent {
        PingEvent {
            location_id: location.to_string(),
            vessel_id: vessel.to_string(),
            time: NaiveDateTime::parse_from_str(time, "%Y-%m-%dT%H:%M:%S")
                .unwrap()
                .and_utc(),
        }
    }

    #[test]
    fn vessel_pings_are_time_sorted() {
        let pings = vec![
            ping("l1", "v1", "2035-02-03T00:00:00"),
            ping("l1", "v1", "2035-02-01T00:00:00"),
            ping("l1", "v2", "2035-02-02T00:00:00"),
            ping("l1", "v1", "2035-02-02T00:00:00"),
        ];
        let dataset = MovementDataset::assemble(
            vec![],
            pings,
            vec![],
            vec![],
            vec![],
            HashMap::new(),
            IngestStats::default(),
        );

        let times: Vec<_> = dataset.vessel_pings("v1").map(|p| p.time).collect();
        assert_eq!(times.len(), 3);
        assert!(times.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(dataset.vessel_pings("v2").count(), 1);
        assert_eq!(dataset.vessel_pings("missing").count(), 0);
    }

    #[test]
    fn location_resolution_joins_nodes_to_points() {
        let nodes = vec![
            LocationNode {
                id: "loc-1".to_string(),
                name: "Haacklee".to_string(),
            },
            LocationNode {
                id: "loc-2".to_string(),
                name: "Nowhere".to_string(),
            },
        ];
        let mut points = HashMap::new();
        points.insert("Haacklee".to_string(), GeoPoint::new(-164.0, 39.0));

        let dataset = MovementDataset::assemble(
            vec![],
            vec![],
            vec![],
            vec![],
            nodes,
            points,
            IngestStats::default(),
        );

        assert_eq!(
            dataset.resolve_location("loc-1"),
            Some(GeoPoint::new(-164.0, 39.0))
        );
        assert_eq!(dataset.resolve_location("loc-2"), None);
        assert_eq!(dataset.resolve_location("loc-3"), None);
    }

    #[test]
    fn companies_keep_first_seen_order() {
        let vessels = vec![
            Vessel {
                id: "v1".to_string(),
                name: "A".to_string(),
                company: Some("Beta Corp".to_string()),
            },
            Vessel {
                id: "v2".to_string(),
                name: "B".to_string(),
                company: None,
            },
            Vessel {
                id: "v3".to_string(),
                name: "C".to_string(),
                company: Some("Alpha Corp".to_string()),
            },
            Vessel {
                id: "v4".to_string(),
                name: "D".to_string(),
                company: Some("Beta Corp".to_string()),
            },
        ];
        let dataset = MovementDataset::assemble(
            vessels,
            vec![],
            vec![],
            vec![],
            vec![],
            HashMap::new(),
            IngestStats::default(),
        );

        assert_eq!(dataset.companies(), vec!["Beta Corp", "Alpha Corp"]);
    }
}
