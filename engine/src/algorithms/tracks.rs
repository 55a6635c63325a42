//! Track segmentation.
//!
//! A vessel's filtered, time-sorted pings are partitioned into contiguous
//! track segments. Two consecutive retained pings belong to the same
//! segment iff their time delta stays within the gap threshold; a larger
//! delta closes the segment, records the skipped interval as a
//! [`GapEvent`], and starts a new segment at the current point. Segments
//! are never merged across a gap.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::domain::{
    GapEvent, MovementDataset, SuspicionRecord, TrackSegment, Vessel,
};
use crate::core::filter::FilterContext;
use crate::geometry::ZoneIndex;

/// One vessel's derived movement track under a filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VesselTrack {
    pub vessel_id: String,
    pub vessel_name: String,
    pub company: Option<String>,
    pub segments: Vec<TrackSegment>,
    pub gaps: Vec<GapEvent>,
    /// Every retained ping that fell inside at least one forbidden zone.
    pub suspicious_pings: Vec<SuspicionRecord>,
}

impl VesselTrack {
    pub fn is_suspicious(&self) -> bool {
        !self.suspicious_pings.is_empty()
    }
}

/// Builds per-vessel tracks from the immutable dataset.
pub struct TrackBuilder {
    gap_threshold_hours: f64,
}

impl TrackBuilder {
    pub fn new(gap_threshold_hours: f64) -> Self {
        Self {
            gap_threshold_hours,
        }
    }

    /// Derives one vessel's track under the given filter.
    ///
    /// Pings whose location cannot be resolved are dropped. Zero retained
    /// pings produce no segments and no gaps; a single retained ping
    /// produces one single-point segment (no polyline, but it still
    /// anchors suspicion data).
    pub fn build_track(
        &self,
        vessel: &Vessel,
        dataset: &MovementDataset,
        zones: &ZoneIndex,
        filter: &FilterContext,
    ) -> VesselTrack {
        let mut segments = Vec::new();
        let mut gaps = Vec::new();
        let mut suspicious_pings = Vec::new();

        let mut current = TrackSegment::default();
        let mut last_time: Option<DateTime<Utc>> = None;

        for ping in dataset
            .vessel_pings(&vessel.id)
            .filter(|p| filter.includes_time(p.time))
        {
            let Some(point) = dataset.resolve_location(&ping.location_id) else {
                continue;
            };

            let matched = zones.matches(point);
            if !matched.is_empty() {
                suspicious_pings.push(SuspicionRecord {
                    vessel_id: vessel.id.clone(),
                    vessel_name: vessel.name.clone(),
                    zones: matched.iter().map(|z| z.to_string()).collect(),
                    time: ping.time,
                });
            }

            if let Some(previous) = last_time {
                let hours = (ping.time - previous).num_milliseconds() as f64 / 3_600_000.0;
                if hours > self.gap_threshold_hours {
                    if let Some(last_point) = current.points.last().copied() {
                        gaps.push(GapEvent {
                            from: last_point,
                            to: point,
                            hours,
                        });
                    }
                    segments.push(std::mem::take(&mut current));
                    current.points.push(point);
                } else {
                    current.points.push(point);
                }
            } else {
                current.points.push(point);
            }
            last_time = Some(ping.time);
        }

        if !current.points.is_empty() {
            segments.push(current);
        }

        VesselTrack {
            vessel_id: vessel.id.clone(),
            vessel_name: vessel.name.clone(),
            company: vessel.company.clone(),
            segments,
            gaps,
            suspicious_pings,
        }
    }
}
