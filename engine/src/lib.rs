//! Oceanus vessel-movement suspicion analytics.
//!
//! The engine ingests three immutable datasets (a vessel/event graph, a
//! geography feature collection, and a location-node index) and derives,
//! on demand, per-vessel movement tracks split at transponder gaps,
//! forbidden-zone membership of each ping, and rolled-up suspicion
//! statistics per company, per zone, and per (company, zone) flow. All
//! derivations are parameterized by a [`core::filter::FilterContext`] and
//! recomputed from scratch on every query; rendering is an external
//! concern that consumes the plain data structures returned by
//! [`services::dashboard::DashboardService`].

pub mod algorithms;
pub mod config;
pub mod core;
pub mod error;
pub mod geometry;
pub mod io;
pub mod parsing;
pub mod preprocessing;
pub mod services;

pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
pub use services::dashboard::DashboardService;
