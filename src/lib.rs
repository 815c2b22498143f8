pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod dashboard;
pub mod domain;
pub mod server;
pub mod utils;

pub use adapters::{HttpRivalClient, SqliteHistoryStore};
pub use app::Probe;
pub use config::AppConfig;
pub use core::Simulation;
pub use utils::error::{PopulationError, Result};
