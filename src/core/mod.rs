pub mod lotka_volterra;
pub mod simulation;

pub use crate::domain::model::{ModelParams, RivalReading, StepOutcome};
pub use crate::domain::ports::{HistoryStore, RivalSource};
pub use crate::utils::error::Result;
pub use simulation::Simulation;
