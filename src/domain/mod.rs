// Domain layer: models, ports and the listing parser. Nothing in here does I/O.

pub mod diagnostic;
pub mod model;
pub mod ports;

pub mod services;
