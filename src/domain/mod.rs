// Domain layer: models, location parsing, labels and ports. No I/O here.

pub mod labels;
pub mod location;
pub mod model;
pub mod ports;
