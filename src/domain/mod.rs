// Domain layer: request/response models and the pricing gateway port.

pub mod model;
pub mod ports;
