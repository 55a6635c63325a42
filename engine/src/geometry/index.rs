//! Forbidden-zone containment index.
//!
//! Holds the subset of loaded zones whose kind is in the configured
//! suspicious-kind set, in geography-payload input order. That order is
//! the documented iteration order of the first-match policy: a ping inside
//! several overlapping forbidden zones is attributed to the first one the
//! index holds.
//!
//! Each zone carries a precomputed axis-aligned bounding box so the exact
//! polygon test only runs for points that pass the cheap rectangle check.

use geo::{BoundingRect, Contains};
use geo_types::Geometry;

use crate::config::EngineConfig;
use crate::core::domain::{GeoPoint, Zone};

/// Axis-aligned bounding box in lon/lat.
#[derive(Debug, Clone, Copy)]
struct BoundingBox {
    min_lon: f64,
    max_lon: f64,
    min_lat: f64,
    max_lat: f64,
}

impl BoundingBox {
    fn from_geometry(geometry: &Geometry<f64>) -> Option<Self> {
        let rect = geometry.bounding_rect()?;
        Some(Self {
            min_lon: rect.min().x,
            max_lon: rect.max().x,
            min_lat: rect.min().y,
            max_lat: rect.max().y,
        })
    }

    fn contains_point(&self, point: GeoPoint) -> bool {
        point.lon >= self.min_lon
            && point.lon <= self.max_lon
            && point.lat >= self.min_lat
            && point.lat <= self.max_lat
    }
}

#[derive(Debug, Clone)]
struct IndexedZone {
    name: String,
    bbox: Option<BoundingBox>,
    geometry: Geometry<f64>,
}

/// Containment index over the forbidden zones.
#[derive(Debug, Clone, Default)]
pub struct ZoneIndex {
    forbidden: Vec<IndexedZone>,
}

impl ZoneIndex {
    /// Builds the index from the loaded zones, keeping those whose kind is
    /// in the configured suspicious set, in input order.
    pub fn build(zones: &[Zone], config: &EngineConfig) -> Self {
        let forbidden: Vec<IndexedZone> = zones
            .iter()
            .filter(|z| {
                z.kind
                    .as_deref()
                    .map(|kind| config.is_suspicious_kind(kind))
                    .unwrap_or(false)
            })
            .map(|z| IndexedZone {
                name: z.name.clone(),
                bbox: BoundingBox::from_geometry(&z.geometry),
                geometry: z.geometry.clone(),
            })
            .collect();

        log::info!(
            "Zone index built: {} forbidden of {} zones",
            forbidden.len(),
            zones.len()
        );

        Self { forbidden }
    }

    pub fn len(&self) -> usize {
        self.forbidden.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forbidden.is_empty()
    }

    /// Forbidden zone names in iteration order.
    pub fn zone_names(&self) -> impl Iterator<Item = &str> {
        self.forbidden.iter().map(|z| z.name.as_str())
    }

    /// Name of the first forbidden zone containing the point.
    ///
    /// This is the aggregation policy: even when overlapping zones all
    /// contain the point, only the first in iteration order is returned.
    pub fn first_match(&self, point: GeoPoint) -> Option<&str> {
        self.forbidden
            .iter()
            .find(|z| Self::zone_contains(z, point))
            .map(|z| z.name.as_str())
    }

    /// Every forbidden zone containing the point, in iteration order.
    pub fn matches(&self, point: GeoPoint) -> Vec<&str> {
        self.forbidden
            .iter()
            .filter(|z| Self::zone_contains(z, point))
            .map(|z| z.name.as_str())
            .collect()
    }

    /// Returns `true` if a forbidden zone with this name exists.
    pub fn has_zone(&self, zone_name: &str) -> bool {
        self.forbidden.iter().any(|z| z.name == zone_name)
    }

    /// Tests the point against one named forbidden zone.
    ///
    /// Returns `None` when no forbidden zone has that name.
    pub fn contains_in(&self, zone_name: &str, point: GeoPoint) -> Option<bool> {
        self.forbidden
            .iter()
            .find(|z| z.name == zone_name)
            .map(|z| Self::zone_contains(z, point))
    }

    fn zone_contains(zone: &IndexedZone, point: GeoPoint) -> bool {
        if let Some(bbox) = &zone.bbox {
            if !bbox.contains_point(point) {
                return false;
            }
        }
        zone.geometry.contains(&point.to_point())
    }
}
