use crate::config::AppConfig;
use crate::dashboard::{rows_from_history, species_stats, spawn_auto_step, ApiClient};
use crate::utils::error::Result;
use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::future::Future;
use tokio::task::JoinHandle;

pub const SERVICE_NAME: &str = "Golem Dashboard";
/// Upper bound for one "run N steps" request.
pub const MAX_STEPS_PER_REQUEST: u32 = 50;

const DASHBOARD_HTML: &str = include_str!("dashboard.html");

/// Aborts the wrapped task when dropped, including when `run` itself is dropped.
struct AbortOnDrop(JoinHandle<()>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

#[derive(Clone)]
pub struct DashboardState {
    pub client: ApiClient,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct StepQuery {
    pub count: Option<u32>,
}

/// Same-origin only: no CORS headers are ever emitted.
pub fn router(state: DashboardState) -> Router {
    Router::new()
        .route("/", get(page))
        .route("/health", get(health))
        .route("/api/state", get(state_view))
        .route("/api/history", get(history))
        .route("/api/stats", get(stats))
        .route("/api/step", post(step))
        .route("/api/reset", post(reset))
        .with_state(state)
}

pub async fn run<F>(config: &AppConfig, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let settings = &config.dashboard;
    let client = ApiClient::new(&settings.api_url, settings.request_timeout())?;
    tracing::info!("📊 Starting {} against {}", SERVICE_NAME, client.base_url());

    let _auto_step = settings
        .auto_step
        .then(|| AbortOnDrop(spawn_auto_step(client.clone(), settings.refresh_interval())));

    if !settings.headless {
        println!("🌐 Open http://localhost:{} in your browser", settings.port);
    }

    let app = router(DashboardState {
        client,
        port: settings.port,
    });
    super::serve(app, &settings.host, settings.port, shutdown).await
}

async fn page() -> impl IntoResponse {
    Html(DASHBOARD_HTML)
}

async fn health(State(state): State<DashboardState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "port": state.port,
        "api_reachable": state.client.is_healthy().await,
    }))
}

async fn state_view(State(state): State<DashboardState>) -> Json<Value> {
    match state.client.fetch_state().await {
        Some(view) => Json(json!({"available": true, "state": view})),
        None => Json(json!({"available": false})),
    }
}

async fn history(State(state): State<DashboardState>) -> Json<Value> {
    let records = state.client.fetch_history().await;
    let rows = rows_from_history(&records);
    Json(json!({"rows": rows, "total_steps": records.len()}))
}

async fn stats(State(state): State<DashboardState>) -> Json<Value> {
    let records = state.client.fetch_history().await;
    Json(json!(species_stats(&rows_from_history(&records))))
}

async fn step(State(state): State<DashboardState>, Query(query): Query<StepQuery>) -> Json<Value> {
    let requested = query.count.unwrap_or(1).clamp(1, MAX_STEPS_PER_REQUEST);

    let mut succeeded = 0;
    for _ in 0..requested {
        if state.client.run_step().await {
            succeeded += 1;
        }
    }

    Json(json!({"requested": requested, "succeeded": succeeded}))
}

async fn reset(State(state): State<DashboardState>) -> Json<Value> {
    Json(json!({"success": state.client.reset().await}))
}
