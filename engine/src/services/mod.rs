//! Query services layered over the immutable dataset.
//!
//! [`dashboard`] is the single entry point external renderers depend on;
//! [`timeline`] and [`zone_report`] hold the pure computations it
//! delegates to for the time-series and per-zone views.

pub mod dashboard;
pub mod timeline;
pub mod zone_report;

pub use dashboard::{DashboardService, DashboardSnapshot};
