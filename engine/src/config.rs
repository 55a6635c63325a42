//! Engine configuration file support.
//!
//! This module provides the tunable parameters of the analysis engine and
//! utilities for reading them from TOML configuration files. Every field
//! has a default, so an absent or partial file yields a working
//! configuration.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{EngineError, EngineResult};

/// Zone kinds treated as forbidden when no configuration overrides them.
pub static DEFAULT_SUSPICIOUS_KINDS: Lazy<Vec<String>> =
    Lazy::new(|| vec!["Ecological Preserve".to_string()]);

/// Engine configuration.
///
/// # Examples
///
/// ```
/// use oceanus_engine::config::EngineConfig;
///
/// let config = EngineConfig::default();
/// assert_eq!(config.gap_threshold_hours, 12.0);
/// assert_eq!(config.top_companies, 10);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Zone kinds whose polygons count as forbidden zones.
    #[serde(default = "default_suspicious_kinds")]
    pub suspicious_kinds: Vec<String>,

    /// Largest gap between consecutive pings that still belongs to one
    /// track segment, in hours.
    #[serde(default = "default_gap_threshold_hours")]
    pub gap_threshold_hours: f64,

    /// How many ranked companies the unscoped dashboard displays.
    #[serde(default = "default_top_companies")]
    pub top_companies: usize,

    /// Company always retained in ranked results regardless of its rank.
    #[serde(default = "default_baseline_company")]
    pub baseline_company: Option<String>,
}

fn default_suspicious_kinds() -> Vec<String> {
    DEFAULT_SUSPICIOUS_KINDS.clone()
}

fn default_gap_threshold_hours() -> f64 {
    12.0
}

fn default_top_companies() -> usize {
    10
}

fn default_baseline_company() -> Option<String> {
    Some("SouthSeafood Express Corp".to_string())
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            suspicious_kinds: default_suspicious_kinds(),
            gap_threshold_hours: default_gap_threshold_hours(),
            top_companies: default_top_companies(),
            baseline_company: default_baseline_company(),
        }
    }
}

impl EngineConfig {
    /// Parse configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> EngineResult<Self> {
        toml::from_str(content)
            .map_err(|e| EngineError::Configuration(format!("Failed to parse config: {}", e)))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(EngineConfig)` if successful
    /// * `Err(EngineError)` if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            EngineError::Configuration(format!("Failed to read config file: {}", e))
        })?;

        Self::from_toml_str(&content)
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `engine.toml` in:
    /// 1. Current directory
    /// 2. `config/` directory
    /// 3. Parent directory
    ///
    /// Falls back to defaults when no file exists.
    pub fn from_default_location() -> EngineResult<Self> {
        let search_paths = vec![
            PathBuf::from("engine.toml"),
            PathBuf::from("config/engine.toml"),
            PathBuf::from("../engine.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Returns `true` if the given zone kind is in the suspicious set.
    pub fn is_suspicious_kind(&self, kind: &str) -> bool {
        self.suspicious_kinds.iter().any(|k| k == kind)
    }
}
