// Domain layer: records moved between the two trackers and the ports the pipeline depends on.

pub mod model;
pub mod ports;
