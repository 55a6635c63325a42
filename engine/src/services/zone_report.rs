//! Per-zone activity reporting.
//!
//! Answers "who pinged inside this forbidden zone": every ping of every
//! vessel whose point the zone contains, under the active date filter,
//! grouped by company. Unlike the suspicion aggregation, vessels without
//! a resolvable company are included here, grouped under `"Unknown"`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::core::domain::MovementDataset;
use crate::core::filter::FilterContext;
use crate::error::{EngineError, EngineResult};
use crate::geometry::ZoneIndex;

const UNKNOWN: &str = "Unknown";

/// One ping logged inside the zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZonePing {
    pub time: DateTime<Utc>,
    pub company: String,
    pub vessel: String,
}

/// A company's footprint inside the zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneCompanyActivity {
    pub company: String,
    pub ping_count: u64,
    /// Distinct vessel names in first-seen order.
    pub vessels: Vec<String>,
}

/// Activity summary for one forbidden zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneActivityReport {
    pub zone: String,
    /// All pings in the zone, sorted by time.
    pub pings: Vec<ZonePing>,
    /// Per-company counts, descending; ties keep first-seen order.
    pub companies: Vec<ZoneCompanyActivity>,
}

/// Builds the activity report for a named forbidden zone.
///
/// Only the date-range part of the filter applies: the report always
/// spans all companies. Unknown zone names are an error.
pub fn zone_report(
    dataset: &MovementDataset,
    zones: &ZoneIndex,
    filter: &FilterContext,
    zone_name: &str,
) -> EngineResult<ZoneActivityReport> {
    if !zones.has_zone(zone_name) {
        return Err(EngineError::UnknownZone(zone_name.to_string()));
    }

    let mut pings = Vec::new();
    for ping in dataset.pings.iter().filter(|p| filter.includes_time(p.time)) {
        let Some(point) = dataset.resolve_location(&ping.location_id) else {
            continue;
        };
        if zones.contains_in(zone_name, point) != Some(true) {
            continue;
        }

        let vessel = dataset.vessel_by_id(&ping.vessel_id);
        pings.push(ZonePing {
            time: ping.time,
            company: vessel
                .and_then(|v| v.company.clone())
                .unwrap_or_else(|| UNKNOWN.to_string()),
            vessel: vessel
                .map(|v| v.name.clone())
                .unwrap_or_else(|| UNKNOWN.to_string()),
        });
    }

    pings.sort_by_key(|p| p.time);

    let mut companies: Vec<ZoneCompanyActivity> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for ping in &pings {
        let i = match index.get(&ping.company) {
            Some(&i) => i,
            None => {
                index.insert(ping.company.clone(), companies.len());
                companies.push(ZoneCompanyActivity {
                    company: ping.company.clone(),
                    ping_count: 0,
                    vessels: Vec::new(),
                });
                companies.len() - 1
            }
        };
        companies[i].ping_count += 1;
        if !companies[i].vessels.iter().any(|v| v == &ping.vessel) {
            companies[i].vessels.push(ping.vessel.clone());
        }
    }
    companies.sort_by(|a, b| b.ping_count.cmp(&a.ping_count));

    Ok(ZoneActivityReport {
        zone: zone_name.to_string(),
        pings,
        companies,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::core::domain::{
        GeoPoint, IngestStats, LocationNode, PingEvent, Vessel, Zone,
    };
    use crate::core::filter::DateRange;
    use chrono::{NaiveDate, NaiveDateTime};
    use geo_types::{LineString, Polygon};
    use std::collections::HashMap;

    fn fixture() -> (MovementDataset, ZoneIndex) {
        let preserve = Polygon::new(
            LineString::from(vec![(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0), (0.0, 0.0)]),
            vec![],
        );
        let mut points = HashMap::new();
        points.insert("Inside".to_string(), GeoPoint::new(1.0, 1.0));
        points.insert("Outside".to_string(), GeoPoint::new(9.0, 9.0));

        let ping = |vessel: &str, location: &str, time: &str| PingEvent {
            location_id: location.to_string(),
            vessel_id: vessel.to_string(),
            time: NaiveDateTime::parse_from_str(time, "%Y-%m-%dT%H:%M:%S")
                .unwrap()
                .and_utc(),
        };

        let dataset = MovementDataset::assemble(
            vec![
                Vessel {
                    id: "v-1".to_string(),
                    name: "Roach".to_string(),
                    company: Some("Alpha Corp".to_string()),
                },
                Vessel {
                    id: "v-2".to_string(),
                    name: "Dace".to_string(),
                    company: Some("Alpha Corp".to_string()),
                },
                Vessel {
                    id: "v-3".to_string(),
                    name: "Chub".to_string(),
                    company: None,
                },
            ],
            vec![
                ping("v-1", "in", "2035-02-02T00:00:00"),
                ping("v-2", "in", "2035-02-01T00:00:00"),
                ping("v-2", "out", "2035-02-01T06:00:00"),
                ping("v-3", "in", "2035-02-03T00:00:00"),
                ping("v-9", "in", "2035-02-04T00:00:00"),
            ],
            vec![],
            vec![Zone {
                name: "Ghoti Preserve".to_string(),
                kind: Some("Ecological Preserve".to_string()),
                geometry: preserve.into(),
            }],
            vec![
                LocationNode { id: "in".to_string(), name: "Inside".to_string() },
                LocationNode { id: "out".to_string(), name: "Outside".to_string() },
            ],
            points,
            IngestStats::default(),
        );
        let zones = ZoneIndex::build(&dataset.zones, &EngineConfig::default());
        (dataset, zones)
    }

    #[test]
    fn report_collects_and_groups_zone_pings() {
        let (dataset, zones) = fixture();
        let report =
            zone_report(&dataset, &zones, &FilterContext::unscoped(), "Ghoti Preserve").unwrap();

        assert_eq!(report.pings.len(), 4);
        // Sorted by time.
        assert!(report.pings.windows(2).all(|w| w[0].time <= w[1].time));

        // Alpha Corp has 2 pings from 2 vessels; the no-company vessel and
        // the dangling vessel reference group under Unknown.
        assert_eq!(report.companies[0].company, "Alpha Corp");
        assert_eq!(report.companies[0].ping_count, 2);
        assert_eq!(report.companies[0].vessels, vec!["Dace", "Roach"]);
        assert_eq!(report.companies[1].company, "Unknown");
        assert_eq!(report.companies[1].ping_count, 2);
    }

    #[test]
    fn date_filter_applies_to_the_report() {
        let (dataset, zones) = fixture();
        let filter = FilterContext::unscoped().with_date_range(DateRange::from_dates(
            NaiveDate::from_ymd_opt(2035, 2, 1).unwrap(),
            NaiveDate::from_ymd_opt(2035, 2, 2).unwrap(),
        ));

        let report = zone_report(&dataset, &zones, &filter, "Ghoti Preserve").unwrap();
        assert_eq!(report.pings.len(), 2);
    }

    #[test]
    fn unknown_zone_is_an_error() {
        let (dataset, zones) = fixture();
        let result = zone_report(&dataset, &zones, &FilterContext::unscoped(), "Nemo Reef");
        assert!(matches!(result, Err(EngineError::UnknownZone(_))));
    }
}
