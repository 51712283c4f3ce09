// Domain layer: core models, pricing parameters and ports (interfaces).

pub mod model;
pub mod ports;
pub mod pricing;
