//! Dashboard side: API client, chart rows and statistics, auto-refresh loop.

pub mod client;
pub mod stats;

pub use client::{ApiClient, StateView};
pub use stats::{rows_from_history, species_stats, PopulationRow, SpeciesStats};

use std::time::Duration;
use tokio::task::JoinHandle;

/// Run one simulation step every `interval`, like a page that keeps reloading.
pub fn spawn_auto_step(client: ApiClient, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // 第一個 tick 立即觸發，略過
        ticker.tick().await;

        loop {
            ticker.tick().await;
            if client.run_step().await {
                tracing::debug!("⏱️ Auto step executed");
            }
        }
    })
}
