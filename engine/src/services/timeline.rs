//! Daily time-series derivation.
//!
//! Both series are computed over the full dataset rather than the active
//! date filter: the timeline is what a date brush is drawn on, so it must
//! not shrink to its own selection.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::domain::MovementDataset;
use crate::geometry::ZoneIndex;

/// One day of a derived series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Total transacted cargo quantity per day, across all companies.
pub fn cargo_volume_daily(dataset: &MovementDataset) -> Vec<TimelinePoint> {
    let mut daily: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for transaction in &dataset.transactions {
        *daily.entry(transaction.date).or_insert(0.0) += transaction.quantity_tons;
    }

    daily
        .into_iter()
        .map(|(date, value)| TimelinePoint { date, value })
        .collect()
}

/// Number of forbidden-zone pings per day for one company's vessels.
pub fn suspicious_pings_daily(
    dataset: &MovementDataset,
    zones: &ZoneIndex,
    company: &str,
) -> Vec<TimelinePoint> {
    let mut daily: BTreeMap<NaiveDate, u64> = BTreeMap::new();

    for vessel in dataset
        .vessels
        .iter()
        .filter(|v| v.company.as_deref() == Some(company))
    {
        for ping in dataset.vessel_pings(&vessel.id) {
            let Some(point) = dataset.resolve_location(&ping.location_id) else {
                continue;
            };
            if zones.first_match(point).is_some() {
                *daily.entry(ping.time.date_naive()).or_insert(0) += 1;
            }
        }
    }

    daily
        .into_iter()
        .map(|(date, count)| TimelinePoint {
            date,
            value: count as f64,
        })
        .collect()
}
