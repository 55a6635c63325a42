//! Zone containment queries.

pub mod index;

pub use index::ZoneIndex;
