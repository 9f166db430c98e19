// Domain layer: listing models and the page-source port. No I/O here.

pub mod model;
pub mod ports;
