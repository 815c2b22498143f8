use crate::domain::model::{HistoryEntry, RivalReading};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Where the vampire population comes from.
///
/// Implementations never fail: when the rival cannot be read they hand back
/// `fallback` with `connected = false`.
#[async_trait]
pub trait RivalSource: Send + Sync {
    async fn vampire_size(&self, fallback: f64) -> RivalReading;
}

#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn save_step(&self, time_step: u64, populations: &BTreeMap<String, f64>) -> Result<()>;
    /// Entries ordered by time step, one per step.
    async fn history(&self) -> Result<Vec<HistoryEntry>>;
    async fn clear(&self) -> Result<()>;
    fn location(&self) -> &str;
}
