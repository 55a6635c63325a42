//! Parser for the geography feature collection.
//!
//! Polygon and MultiPolygon features become [`Zone`]s; Point features
//! become the named coordinates that location nodes resolve to. Features
//! with unusable geometry are skipped and counted, never fatal.

use anyhow::{Context, Result};
use geo_types::{Geometry, LineString, MultiPolygon, Polygon};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

use crate::core::domain::{GeoPoint, Zone};

/// Display name used for polygon features that carry no name property.
const UNNAMED_ZONE: &str = "Forbidden Zone";

/// Raw JSON structure for feature properties
#[derive(Debug, Default, Deserialize)]
struct RawProperties {
    #[serde(rename = "*Kind")]
    kind: Option<String>,
    #[serde(rename = "Name")]
    name: Option<String>,
}

/// Raw JSON structure for a feature geometry
#[derive(Debug, Deserialize)]
struct RawGeometry {
    #[serde(rename = "type")]
    geometry_type: String,
    coordinates: Value,
}

/// Raw JSON structure for a single feature
#[derive(Debug, Deserialize)]
struct RawFeature {
    geometry: Option<RawGeometry>,
    #[serde(default)]
    properties: Option<RawProperties>,
}

/// Container for the feature collection structure
#[derive(Debug, Deserialize)]
struct RawFeatureCollection {
    features: Vec<RawFeature>,
}

/// Parsed geography payload.
#[derive(Debug, Clone)]
pub struct GeographyPayload {
    /// Polygonal zones in payload input order.
    pub zones: Vec<Zone>,
    /// Point-feature coordinates keyed by feature name; on duplicate
    /// names the first feature wins.
    pub points_by_name: HashMap<String, GeoPoint>,
    pub skipped_features: usize,
}

/// Parse the geography payload from a JSON string.
pub fn parse_geography_str(json: &str) -> Result<GeographyPayload> {
    let raw: RawFeatureCollection =
        serde_json::from_str(json).context("Failed to parse geography payload")?;

    let mut zones = Vec::new();
    let mut points_by_name: HashMap<String, GeoPoint> = HashMap::new();
    let mut skipped = 0usize;

    for feature in raw.features {
        let properties = feature.properties.unwrap_or_default();
        let Some(geometry) = feature.geometry else {
            skipped += 1;
            continue;
        };

        match geometry.geometry_type.as_str() {
            "Polygon" => match parse_polygon(&geometry.coordinates) {
                Some(polygon) => zones.push(make_zone(properties, Geometry::Polygon(polygon))),
                None => skipped += 1,
            },
            "MultiPolygon" => match parse_multi_polygon(&geometry.coordinates) {
                Some(multi) => zones.push(make_zone(properties, Geometry::MultiPolygon(multi))),
                None => skipped += 1,
            },
            "Point" => match (properties.name, parse_position(&geometry.coordinates)) {
                (Some(name), Some(point)) => {
                    points_by_name.entry(name).or_insert(point);
                }
                _ => skipped += 1,
            },
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        log::warn!("Geography payload: skipped {} unusable features", skipped);
    }

    Ok(GeographyPayload {
        zones,
        points_by_name,
        skipped_features: skipped,
    })
}

fn make_zone(properties: RawProperties, geometry: Geometry<f64>) -> Zone {
    Zone {
        name: properties.name.unwrap_or_else(|| UNNAMED_ZONE.to_string()),
        kind: properties.kind,
        geometry,
    }
}

/// A single `[lon, lat, ...]` position array.
fn parse_position(value: &Value) -> Option<GeoPoint> {
    let coords = value.as_array()?;
    let lon = coords.first()?.as_f64()?;
    let lat = coords.get(1)?.as_f64()?;
    Some(GeoPoint::new(lon, lat))
}

fn parse_ring(value: &Value) -> Option<LineString<f64>> {
    let positions = value
        .as_array()?
        .iter()
        .map(parse_position)
        .collect::<Option<Vec<_>>>()?;
    if positions.len() < 4 {
        return None;
    }
    Some(LineString::from(
        positions.iter().map(|p| (p.lon, p.lat)).collect::<Vec<_>>(),
    ))
}

/// First ring is the outer boundary; any further rings are holes.
fn parse_polygon(value: &Value) -> Option<Polygon<f64>> {
    let rings = value
        .as_array()?
        .iter()
        .map(parse_ring)
        .collect::<Option<Vec<_>>>()?;
    let mut rings = rings.into_iter();
    let exterior = rings.next()?;
    Some(Polygon::new(exterior, rings.collect()))
}

fn parse_multi_polygon(value: &Value) -> Option<MultiPolygon<f64>> {
    let polygons = value
        .as_array()?
        .iter()
        .map(parse_polygon)
        .collect::<Option<Vec<_>>>()?;
    if polygons.is_empty() {
        return None;
    }
    Some(MultiPolygon::new(polygons))
}
