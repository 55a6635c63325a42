//! Dashboard query facade.
//!
//! [`DashboardService`] is the single entry point external renderers call.
//! It owns the immutable dataset, the engine configuration, the forbidden
//! zone index, and the one piece of mutable state in the whole engine: the
//! active [`FilterContext`]. Every query recomputes from the dataset;
//! there is no caching layer, so two queries under the same filter return
//! identical results by construction.
//!
//! Each filter mutation bumps a monotonically increasing version counter.
//! Callers that coalesce rapid filter changes (a brush drag, a debounced
//! control) can tag recomputations with the version and discard results
//! that are superseded by the time they arrive.

use serde::{Deserialize, Serialize};

use crate::algorithms::suspicion::{self, SuspicionData};
use crate::algorithms::tracks::{TrackBuilder, VesselTrack};
use crate::config::EngineConfig;
use crate::core::domain::{MovementDataset, SuspicionRecord};
use crate::core::filter::{CompanySelector, DateRange, FilterContext};
use crate::error::EngineResult;
use crate::geometry::ZoneIndex;
use crate::preprocessing::validator::{DatasetValidator, ValidationResult};
use crate::services::timeline::{self, TimelinePoint};
use crate::services::zone_report::{self, ZoneActivityReport};

/// Everything a renderer needs for one dashboard refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub version: u64,
    pub filter: FilterContext,
    /// Top-N ranked companies with the baseline pinned.
    pub ranked_companies: Vec<(String, u64)>,
    pub suspicion: SuspicionData,
    pub tracks: Vec<VesselTrack>,
    /// Companies for the selection control: baseline first, rest
    /// alphabetical.
    pub selector_companies: Vec<String>,
}

/// The query facade over one loaded dataset.
pub struct DashboardService {
    dataset: MovementDataset,
    config: EngineConfig,
    zone_index: ZoneIndex,
    filter: FilterContext,
    version: u64,
}

impl DashboardService {
    /// Loads the three payload files and builds the facade in one step.
    ///
    /// The load is all-or-nothing: any read or parse failure is terminal
    /// and no service is constructed.
    pub async fn from_files(
        graph_path: &std::path::Path,
        geography_path: &std::path::Path,
        locations_path: &std::path::Path,
        config: EngineConfig,
    ) -> EngineResult<Self> {
        let dataset = crate::io::DatasetLoader::load(graph_path, geography_path, locations_path)
            .await
            .map_err(|e| crate::error::EngineError::Load(format!("{e:#}")))?;
        Ok(Self::new(dataset, config))
    }

    pub fn new(dataset: MovementDataset, config: EngineConfig) -> Self {
        let zone_index = ZoneIndex::build(&dataset.zones, &config);
        Self {
            dataset,
            config,
            zone_index,
            filter: FilterContext::unscoped(),
            version: 0,
        }
    }

    pub fn dataset(&self) -> &MovementDataset {
        &self.dataset
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn filter(&self) -> &FilterContext {
        &self.filter
    }

    /// The current recompute-trigger version. Bumped on every filter
    /// mutation.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Sets the company selector; returns the new version.
    pub fn set_company(&mut self, company: CompanySelector) -> u64 {
        self.filter.company = company;
        self.bump()
    }

    /// Sets or clears the date range; returns the new version.
    pub fn set_date_range(&mut self, range: Option<DateRange>) -> u64 {
        self.filter.date_range = range;
        self.bump()
    }

    /// Clears all filters; returns the new version.
    pub fn reset_filters(&mut self) -> u64 {
        self.filter = FilterContext::unscoped();
        self.bump()
    }

    fn bump(&mut self) -> u64 {
        self.version += 1;
        log::debug!("Filter changed (version {}): {:?}", self.version, self.filter);
        self.version
    }

    /// The full suspicion aggregate for the current filter.
    pub fn suspicion(&self) -> SuspicionData {
        suspicion::aggregate(&self.dataset, &self.zone_index, &self.filter)
    }

    /// The full ranked company list for the current filter.
    pub fn ranked_companies(&self) -> Vec<(String, u64)> {
        self.suspicion().company_totals
    }

    /// Top-N ranked companies with the configured baseline pinned.
    pub fn top_companies_pinned(&self) -> Vec<(String, u64)> {
        self.suspicion()
            .top_companies_pinned(self.config.top_companies, self.config.baseline_company.as_deref())
    }

    /// Pure top-N without baseline pinning.
    pub fn top_companies(&self, n: usize) -> Vec<(String, u64)> {
        self.suspicion().top_companies(n)
    }

    /// Tracks for the companies the dashboard displays: the selected
    /// company alone, or the pinned top-N when unscoped. Vessels with no
    /// pings in range produce no entry.
    pub fn tracks(&self) -> Vec<VesselTrack> {
        let companies = self.companies_to_display();
        let builder = TrackBuilder::new(self.config.gap_threshold_hours);

        self.dataset
            .vessels
            .iter()
            .filter(|vessel| {
                vessel
                    .company
                    .as_deref()
                    .map(|c| companies.iter().any(|shown| shown == c))
                    .unwrap_or(false)
            })
            .filter(|vessel| {
                self.dataset
                    .vessel_pings(&vessel.id)
                    .any(|p| self.filter.includes_time(p.time))
            })
            .map(|vessel| {
                builder.build_track(vessel, &self.dataset, &self.zone_index, &self.filter)
            })
            .collect()
    }

    /// Track for one explicit vessel under the current filter, regardless
    /// of company scoping. Vessels without a company are reachable here
    /// even though company-keyed views never include them.
    pub fn vessel_track(&self, vessel_id: &str) -> Option<VesselTrack> {
        let vessel = self.dataset.vessel_by_id(vessel_id)?;
        let builder = TrackBuilder::new(self.config.gap_threshold_hours);
        Some(builder.build_track(vessel, &self.dataset, &self.zone_index, &self.filter))
    }

    fn companies_to_display(&self) -> Vec<String> {
        match &self.filter.company {
            CompanySelector::Company(company) => vec![company.clone()],
            CompanySelector::All => self
                .top_companies_pinned()
                .into_iter()
                .map(|(company, _)| company)
                .collect(),
        }
    }

    /// Companies for the selection control: the baseline first when it
    /// exists in the dataset, the rest alphabetical.
    pub fn selector_companies(&self) -> Vec<String> {
        let mut companies = self.dataset.companies();
        companies.sort();

        if let Some(baseline) = self.config.baseline_company.as_deref() {
            if let Some(pos) = companies.iter().position(|c| c == baseline) {
                let pinned = companies.remove(pos);
                companies.insert(0, pinned);
            }
        }
        companies
    }

    /// Time-sorted suspicion records for one company's vessels under the
    /// current date filter. Every record lists all matched zone names.
    pub fn company_details(&self, company: &str) -> Vec<SuspicionRecord> {
        let mut records = Vec::new();

        for vessel in self
            .dataset
            .vessels
            .iter()
            .filter(|v| v.company.as_deref() == Some(company))
        {
            for ping in self
                .dataset
                .vessel_pings(&vessel.id)
                .filter(|p| self.filter.includes_time(p.time))
            {
                let Some(point) = self.dataset.resolve_location(&ping.location_id) else {
                    continue;
                };
                let matched = self.zone_index.matches(point);
                if !matched.is_empty() {
                    records.push(SuspicionRecord {
                        vessel_id: vessel.id.clone(),
                        vessel_name: vessel.name.clone(),
                        zones: matched.iter().map(|z| z.to_string()).collect(),
                        time: ping.time,
                    });
                }
            }
        }

        records.sort_by_key(|r| r.time);
        records
    }

    /// Activity report for one named forbidden zone under the current
    /// date filter.
    pub fn zone_report(&self, zone_name: &str) -> EngineResult<ZoneActivityReport> {
        zone_report::zone_report(&self.dataset, &self.zone_index, &self.filter, zone_name)
    }

    /// Daily cargo volume across all companies, full dataset.
    pub fn cargo_volume_daily(&self) -> Vec<TimelinePoint> {
        timeline::cargo_volume_daily(&self.dataset)
    }

    /// Daily suspicious-ping counts for one company, full dataset.
    pub fn suspicious_pings_daily(&self, company: &str) -> Vec<TimelinePoint> {
        timeline::suspicious_pings_daily(&self.dataset, &self.zone_index, company)
    }

    /// Quality report over the loaded dataset.
    pub fn validation_report(&self) -> ValidationResult {
        DatasetValidator::validate(&self.dataset)
    }

    /// One bundle with everything a renderer needs for a refresh.
    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            version: self.version,
            filter: self.filter.clone(),
            ranked_companies: self.top_companies_pinned(),
            suspicion: self.suspicion(),
            tracks: self.tracks(),
            selector_companies: self.selector_companies(),
        }
    }
}
