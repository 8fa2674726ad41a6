// Domain layer: draw records, match results and the store port.

pub mod model;
pub mod ports;
