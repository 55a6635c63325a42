//! Suspicion aggregation.
//!
//! One pass over the candidate vessels' filtered pings produces the
//! suspicion statistics: company totals, zone totals, and (company, zone)
//! flow counts, plus the individual suspicion records.
//!
//! Counting follows a first-match policy: a ping inside several
//! overlapping forbidden zones is attributed to the first zone in index
//! iteration order only. The per-ping records still list every matched
//! zone, so the overlap information survives even though the counts
//! deliberately do not double-count.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::core::domain::{MovementDataset, SuspicionRecord};
use crate::core::filter::FilterContext;
use crate::geometry::ZoneIndex;

/// A (company, zone) edge of the suspicion network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowCount {
    pub company: String,
    pub zone: String,
    pub count: u64,
}

/// Counter table that remembers first-seen order, so aggregation output
/// is deterministic for a given payload order.
#[derive(Debug, Clone, Default)]
struct CountTable {
    entries: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl CountTable {
    fn bump(&mut self, key: &str) {
        match self.index.get(key) {
            Some(&i) => self.entries[i].1 += 1,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), 1));
            }
        }
    }

    fn into_entries(self) -> Vec<(String, u64)> {
        self.entries
    }
}

/// The aggregated suspicion statistics for one filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuspicionData {
    /// Company totals ranked by descending count. Ties keep first-seen
    /// order (stable sort over insertion-ordered accumulation).
    pub company_totals: Vec<(String, u64)>,
    /// Suspicious-ping counts per zone name.
    pub zone_totals: BTreeMap<String, u64>,
    /// Flow counts in first-seen order.
    pub flows: Vec<FlowCount>,
    /// One record per counted ping, in scan order.
    pub records: Vec<SuspicionRecord>,
}

impl SuspicionData {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The full ranked company list.
    pub fn ranked_companies(&self) -> &[(String, u64)] {
        &self.company_totals
    }

    /// Pure top-N by rank, no pinning.
    pub fn top_companies(&self, n: usize) -> Vec<(String, u64)> {
        self.company_totals.iter().take(n).cloned().collect()
    }

    /// Top-N by rank, with the baseline company appended after the cut
    /// when it exists in the full ranking but missed the top N. Never
    /// duplicates a baseline already inside the cut.
    pub fn top_companies_pinned(&self, n: usize, baseline: Option<&str>) -> Vec<(String, u64)> {
        let mut top = self.top_companies(n);
        if let Some(baseline) = baseline {
            if !top.iter().any(|(company, _)| company == baseline) {
                if let Some(entry) = self
                    .company_totals
                    .iter()
                    .find(|(company, _)| company == baseline)
                {
                    top.push(entry.clone());
                }
            }
        }
        top
    }

    pub fn company_total(&self, company: &str) -> u64 {
        self.company_totals
            .iter()
            .find(|(c, _)| c == company)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }
}

/// Runs the aggregation pass for the given filter.
///
/// Candidate vessels are the selected company's, or all vessels when the
/// filter is unscoped; vessels without a company name are excluded
/// entirely. Pings with unresolvable locations are skipped.
pub fn aggregate(
    dataset: &MovementDataset,
    zones: &ZoneIndex,
    filter: &FilterContext,
) -> SuspicionData {
    let mut company_totals = CountTable::default();
    let mut zone_totals = CountTable::default();
    let mut flows: Vec<FlowCount> = Vec::new();
    let mut flow_index: HashMap<(String, String), usize> = HashMap::new();
    let mut records = Vec::new();

    for vessel in dataset
        .vessels
        .iter()
        .filter(|v| filter.company.matches(v.company.as_deref()))
    {
        let Some(company) = vessel.company.as_deref() else {
            continue;
        };

        for ping in dataset
            .vessel_pings(&vessel.id)
            .filter(|p| filter.includes_time(p.time))
        {
            let Some(point) = dataset.resolve_location(&ping.location_id) else {
                continue;
            };

            let matched = zones.matches(point);
            let Some(first_zone) = matched.first().copied() else {
                continue;
            };

            company_totals.bump(company);
            zone_totals.bump(first_zone);

            let flow_key = (company.to_string(), first_zone.to_string());
            match flow_index.get(&flow_key) {
                Some(&i) => flows[i].count += 1,
                None => {
                    flow_index.insert(flow_key, flows.len());
                    flows.push(FlowCount {
                        company: company.to_string(),
                        zone: first_zone.to_string(),
                        count: 1,
                    });
                }
            }

            records.push(SuspicionRecord {
                vessel_id: vessel.id.clone(),
                vessel_name: vessel.name.clone(),
                zones: matched.iter().map(|z| z.to_string()).collect(),
                time: ping.time,
            });
        }
    }

    let mut ranked = company_totals.into_entries();
    // Stable sort: ties keep first-seen order.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    log::debug!(
        "Suspicion pass: {} records across {} companies, {} zones",
        records.len(),
        ranked.len(),
        zone_totals.entries.len()
    );

    SuspicionData {
        company_totals: ranked,
        zone_totals: zone_totals.into_entries().into_iter().collect(),
        flows,
        records,
    }
}
