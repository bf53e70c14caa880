// Statistical core: normalization, resolution, matchup scoring, projection.

pub mod edge;
pub mod lineup;
pub mod park;
pub mod pitch;
pub mod projection;
pub mod resolve;
pub mod snapshot;
pub mod zscore;
