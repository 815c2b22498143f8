use crate::app::probe::Probe;
use crate::config::AppConfig;
use crate::server::{api, dashboard};
use crate::utils::error::{PopulationError, Result};
use std::future::Future;
use tokio::sync::watch;
use tokio::task::JoinError;

/// Local development run: API in the background, dashboard in the foreground.
///
/// The dashboard only starts once the API health endpoint answers. If the API
/// dies before that, or at any point while the dashboard is serving, the run
/// stops with the API's error. `shutdown` stops both services cleanly.
pub async fn run<F>(config: &AppConfig, probe: Probe, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (stop_tx, mut stop_rx) = watch::channel(false);

    let api_config = config.clone();
    let mut api_task = tokio::spawn(async move {
        api::run(&api_config, async move {
            let _ = stop_rx.changed().await;
        })
        .await
    });

    let health_url = config.api.health_url();
    tracing::info!("⏳ Waiting for API at {}", health_url);

    let ready = tokio::select! {
        ready = probe.wait_until_ready(&health_url) => ready,
        exited = &mut api_task => Err(api_exit_error(exited)),
    };

    if let Err(e) = ready {
        api_task.abort();
        return Err(e);
    }

    let dashboard_run = dashboard::run(config, shutdown);
    tokio::pin!(dashboard_run);

    tokio::select! {
        dashboard_result = &mut dashboard_run => {
            let _ = stop_tx.send(true);
            let api_result = api_task.await.map_err(|e| PopulationError::ServerError {
                message: format!("API task failed: {}", e),
            })?;
            dashboard_result.and(api_result)
        }
        exited = &mut api_task => {
            tracing::error!("❌ API stopped while the dashboard was running");
            Err(api_exit_error(exited))
        }
    }
}

fn api_exit_error(exited: std::result::Result<Result<()>, JoinError>) -> PopulationError {
    match exited {
        Ok(Err(e)) => e,
        Ok(Ok(())) => PopulationError::ServerError {
            message: "API stopped unexpectedly".to_string(),
        },
        Err(e) => PopulationError::ServerError {
            message: format!("API task failed: {}", e),
        },
    }
}
