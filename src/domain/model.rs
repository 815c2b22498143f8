use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const GOLEM: &str = "Golem";
pub const VAMPIRE: &str = "Vampire";

pub const DEFAULT_GROWTH_RATE: f64 = 0.5;
pub const DEFAULT_CARRYING_CAPACITY: f64 = 1000.0;
pub const DEFAULT_ALPHA: f64 = 0.2;
pub const DEFAULT_INITIAL_SIZE: f64 = 100.0;
/// Upper bound of the simulated vampire curve used while the rival is offline.
pub const DEFAULT_VAMPIRE_SIM_CAPACITY: f64 = 1500.0;

/// Golem competition parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelParams {
    /// r
    pub growth_rate: f64,
    /// K
    pub carrying_capacity: f64,
    /// How much vampires hurt golems.
    pub alpha: f64,
    pub initial_size: f64,
    pub vampire_sim_capacity: f64,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            growth_rate: DEFAULT_GROWTH_RATE,
            carrying_capacity: DEFAULT_CARRYING_CAPACITY,
            alpha: DEFAULT_ALPHA,
            initial_size: DEFAULT_INITIAL_SIZE,
            vampire_sim_capacity: DEFAULT_VAMPIRE_SIM_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RivalReading {
    pub value: f64,
    pub connected: bool,
}

impl RivalReading {
    pub fn online(value: f64) -> Self {
        Self {
            value,
            connected: true,
        }
    }

    pub fn offline(fallback: f64) -> Self {
        Self {
            value: fallback,
            connected: false,
        }
    }
}

/// Everything one model step produced, keyed the way the API exposes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub temps: f64,
    pub taille: f64,
    pub vampire: f64,
    pub status_vampire: bool,
    pub taux_de_croissance: f64,
    pub taux_de_competition: f64,
    pub capacite_biotique: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub time: u64,
    pub populations: BTreeMap<String, f64>,
}

impl HistoryEntry {
    pub fn population(&self, species: &str) -> Option<f64> {
        self.populations.get(species).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    pub success: bool,
    pub time_step: u64,
    pub taille: f64,
    pub vampire: f64,
    pub connected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    pub time_step: u64,
    pub taille: f64,
    pub populations: BTreeMap<String, f64>,
    pub connected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub history: Vec<HistoryEntry>,
    pub total_steps: usize,
}

impl From<Vec<HistoryEntry>> for HistoryResponse {
    fn from(history: Vec<HistoryEntry>) -> Self {
        let total_steps = history.len();
        Self {
            history,
            total_steps,
        }
    }
}

/// Species populations recorded for one step.
pub fn step_populations(golem: f64, vampire: f64) -> BTreeMap<String, f64> {
    BTreeMap::from([(GOLEM.to_string(), golem), (VAMPIRE.to_string(), vampire)])
}
