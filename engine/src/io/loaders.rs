//! Dataset loading.
//!
//! The engine needs all three input payloads before any query can run, so
//! the loader reads them as a single joined operation: if any read or
//! parse fails, the whole load fails and no partial dataset is ever
//! constructed. This is the engine's only asynchronous boundary.

use anyhow::{Context, Result};
use std::path::Path;

use crate::core::domain::{IngestStats, MovementDataset};
use crate::parsing::{geography_parser, graph_parser, location_parser};

/// Unified interface for loading the engine dataset.
pub struct DatasetLoader;

impl DatasetLoader {
    /// Load the dataset from the three payload files, all-or-nothing.
    pub async fn load(
        graph_path: &Path,
        geography_path: &Path,
        locations_path: &Path,
    ) -> Result<MovementDataset> {
        let (graph, geography, locations) = tokio::try_join!(
            read_payload(graph_path),
            read_payload(geography_path),
            read_payload(locations_path),
        )?;

        Self::from_strs(&graph, &geography, &locations)
    }

    /// Blocking wrapper around [`DatasetLoader::load`] for synchronous
    /// callers.
    pub fn load_sync(
        graph_path: &Path,
        geography_path: &Path,
        locations_path: &Path,
    ) -> Result<MovementDataset> {
        let runtime = tokio::runtime::Runtime::new()
            .context("Failed to create async runtime for dataset load")?;
        runtime.block_on(Self::load(graph_path, geography_path, locations_path))
    }

    /// Assemble the dataset from in-memory payload strings.
    pub fn from_strs(graph: &str, geography: &str, locations: &str) -> Result<MovementDataset> {
        let graph = graph_parser::parse_graph_str(graph)?;
        let geography = geography_parser::parse_geography_str(geography)?;
        let location_nodes = location_parser::parse_locations_str(locations)?;

        let ingest = IngestStats {
            malformed_ping_dates: graph.stats.malformed_ping_dates,
            malformed_transaction_dates: graph.stats.malformed_transaction_dates,
            missing_quantities: graph.stats.missing_quantities,
            skipped_features: geography.skipped_features,
        };

        let dataset = MovementDataset::assemble(
            graph.vessels,
            graph.pings,
            graph.transactions,
            geography.zones,
            location_nodes,
            geography.points_by_name,
            ingest,
        );

        log::info!(
            "Dataset loaded: {} vessels, {} pings, {} transactions, {} zones, {} locations",
            dataset.vessels.len(),
            dataset.pings.len(),
            dataset.transactions.len(),
            dataset.zones.len(),
            dataset.location_nodes.len()
        );

        Ok(dataset)
    }
}

async fn read_payload(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read payload file: {}", path.display()))
}
