// Domain layer: service records, resource names and the ports the sample operations call through.

pub mod model;
pub mod paths;
pub mod ports;
