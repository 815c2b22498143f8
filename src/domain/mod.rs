// Domain layer: population models and ports. No knowledge of HTTP or SQLite.

pub mod model;
pub mod ports;
