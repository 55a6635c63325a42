pub mod suspicion;
pub mod tracks;

pub use suspicion::{aggregate, FlowCount, SuspicionData};
pub use tracks::{TrackBuilder, VesselTrack};
