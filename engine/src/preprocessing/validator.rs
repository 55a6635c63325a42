//! Dataset validation with detailed error and warning reporting.
//!
//! This module inspects an assembled dataset for quality issues: vessels
//! without a company, pings that cannot be resolved to coordinates,
//! malformed dates dropped at parse time, and duplicate identifiers.
//! Errors indicate the dataset is unusable; warnings are informational
//! and expected on real-world payloads.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::core::domain::MovementDataset;

/// Validation outcome with categorized issues and statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub stats: ValidationStats,
}

/// Summary statistics computed during validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationStats {
    pub total_vessels: usize,
    pub vessels_without_company: usize,
    pub duplicate_vessel_ids: usize,
    pub total_pings: usize,
    pub unresolvable_pings: usize,
    pub malformed_ping_dates: usize,
    pub malformed_transaction_dates: usize,
    pub missing_quantities: usize,
    pub total_zones: usize,
    pub total_location_nodes: usize,
    pub location_nodes_without_geometry: usize,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            stats: ValidationStats::default(),
        }
    }

    /// Adds a critical error and marks the result as invalid.
    pub fn add_error(&mut self, error: String) {
        self.is_valid = false;
        self.errors.push(error);
    }

    /// Adds a non-critical warning without invalidating the result.
    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Validator for the assembled movement dataset.
pub struct DatasetValidator;

impl DatasetValidator {
    /// Validates the dataset and collects statistics.
    pub fn validate(dataset: &MovementDataset) -> ValidationResult {
        let mut result = ValidationResult::new();

        result.stats.total_vessels = dataset.vessels.len();
        result.stats.total_pings = dataset.pings.len();
        result.stats.total_zones = dataset.zones.len();
        result.stats.total_location_nodes = dataset.location_nodes.len();
        result.stats.malformed_ping_dates = dataset.ingest.malformed_ping_dates;
        result.stats.malformed_transaction_dates = dataset.ingest.malformed_transaction_dates;
        result.stats.missing_quantities = dataset.ingest.missing_quantities;

        if dataset.vessels.is_empty() {
            result.add_error("Dataset contains no vessels".to_string());
        }

        Self::check_duplicate_vessels(dataset, &mut result);

        result.stats.vessels_without_company = dataset
            .vessels
            .iter()
            .filter(|v| v.company.is_none())
            .count();
        if result.stats.vessels_without_company > 0 {
            result.add_warning(format!(
                "{} vessels have no company and are excluded from company aggregation",
                result.stats.vessels_without_company
            ));
        }

        result.stats.unresolvable_pings = dataset
            .pings
            .iter()
            .filter(|p| dataset.resolve_location(&p.location_id).is_none())
            .count();
        if result.stats.unresolvable_pings > 0 {
            result.add_warning(format!(
                "{} pings reference locations with no resolvable coordinates",
                result.stats.unresolvable_pings
            ));
        }

        result.stats.location_nodes_without_geometry = dataset
            .location_nodes
            .iter()
            .filter(|n| dataset.resolve_location(&n.id).is_none())
            .count();
        if result.stats.location_nodes_without_geometry > 0 {
            result.add_warning(format!(
                "{} location nodes have no matching point feature",
                result.stats.location_nodes_without_geometry
            ));
        }

        if dataset.ingest.malformed_ping_dates > 0 {
            result.add_warning(format!(
                "{} pings with malformed timestamps were dropped at parse time",
                dataset.ingest.malformed_ping_dates
            ));
        }

        result
    }

    fn check_duplicate_vessels(dataset: &MovementDataset, result: &mut ValidationResult) {
        let mut seen = HashSet::new();
        let mut duplicates = 0;

        for vessel in &dataset.vessels {
            if !seen.insert(&vessel.id) {
                duplicates += 1;
                if duplicates <= 5 {
                    result.add_error(format!("Duplicate vessel id: {}", vessel.id));
                }
            }
        }

        if duplicates > 5 {
            result.add_error(format!(
                "Total duplicate vessel ids: {} (showing first 5)",
                duplicates
            ));
        }

        result.stats.duplicate_vessel_ids = duplicates;
    }
}
