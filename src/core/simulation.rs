use crate::core::lotka_volterra::{simulation_step, unix_seconds};
use crate::domain::model::{
    step_populations, HistoryEntry, ModelParams, SimulationState, StepReport, GOLEM, VAMPIRE,
};
use crate::domain::ports::{HistoryStore, RivalSource};
use crate::utils::error::Result;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Progress {
    current_size: f64,
    time_step: u64,
    connected: bool,
}

/// The running golem simulation: current size, step counter and rival
/// connectivity, backed by a history store.
///
/// Steps and resets hold the state lock for their whole duration, so
/// concurrent requests are applied one after another.
pub struct Simulation {
    params: ModelParams,
    rival: Arc<dyn RivalSource>,
    store: Arc<dyn HistoryStore>,
    progress: Mutex<Progress>,
}

impl Simulation {
    /// Resume from the last stored step, or start fresh when the history is empty.
    pub async fn recover(
        params: ModelParams,
        rival: Arc<dyn RivalSource>,
        store: Arc<dyn HistoryStore>,
    ) -> Result<Self> {
        let history = store.history().await?;

        let progress = match history.last() {
            Some(last) => {
                let current_size = last.population(GOLEM).unwrap_or(params.initial_size);
                tracing::info!(
                    "♻️ System recovered: time={}, size={:.1}",
                    last.time,
                    current_size
                );
                Progress {
                    current_size,
                    time_step: last.time,
                    connected: false,
                }
            }
            None => Progress {
                current_size: params.initial_size,
                time_step: 0,
                connected: false,
            },
        };

        Ok(Self {
            params,
            rival,
            store,
            progress: Mutex::new(progress),
        })
    }

    pub fn params(&self) -> &ModelParams {
        &self.params
    }

    pub async fn step(&self) -> Result<StepReport> {
        self.step_at(unix_seconds()).await
    }

    pub async fn step_at(&self, now: f64) -> Result<StepReport> {
        let mut progress = self.progress.lock().await;

        let outcome =
            simulation_step(progress.current_size, &self.params, self.rival.as_ref(), now).await;
        let time_step = progress.time_step + 1;

        self.store
            .save_step(time_step, &step_populations(outcome.taille, outcome.vampire))
            .await?;

        // 寫入成功後才更新狀態，避免記憶體與資料庫不一致
        *progress = Progress {
            current_size: outcome.taille,
            time_step,
            connected: outcome.status_vampire,
        };

        Ok(StepReport {
            success: true,
            time_step,
            taille: outcome.taille,
            vampire: outcome.vampire,
            connected: outcome.status_vampire,
        })
    }

    pub async fn reset(&self) -> Result<()> {
        let mut progress = self.progress.lock().await;
        self.store.clear().await?;
        *progress = Progress {
            current_size: self.params.initial_size,
            time_step: 0,
            connected: false,
        };
        tracing::info!("🔄 Simulation reset");
        Ok(())
    }

    pub async fn state(&self) -> SimulationState {
        let progress = *self.progress.lock().await;
        // Vampire 的實際數值由 history 提供
        let populations = BTreeMap::from([
            (GOLEM.to_string(), progress.current_size),
            (VAMPIRE.to_string(), 0.0),
        ]);

        SimulationState {
            time_step: progress.time_step,
            taille: progress.current_size,
            populations,
            connected: progress.connected,
        }
    }

    pub async fn current_size(&self) -> f64 {
        self.progress.lock().await.current_size
    }

    pub async fn history(&self) -> Result<Vec<HistoryEntry>> {
        self.store.history().await
    }

    pub fn store_location(&self) -> &str {
        self.store.location()
    }
}
