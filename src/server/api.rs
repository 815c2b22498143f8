use crate::adapters::{HttpRivalClient, SqliteHistoryStore};
use crate::config::AppConfig;
use crate::core::simulation::Simulation;
use crate::domain::model::{HistoryResponse, SimulationState, StepReport, GOLEM, VAMPIRE};
use crate::utils::error::Result;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::future::Future;
use std::sync::Arc;

pub const SERVICE_NAME: &str = "Golem Population API";
pub const GROUP: &str = "F";

#[derive(Clone)]
pub struct ApiState {
    pub simulation: Arc<Simulation>,
    pub port: u16,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/taille", get(population_size))
        .route("/population/taille", get(population_size))
        .route("/taux_de_croissance", get(growth_rate))
        .route("/population/taux_de_croissance", get(growth_rate))
        .route("/taux_de_competition", get(competition))
        .route("/population/taux_de_competition", get(competition))
        .route("/simulation/step", post(step))
        .route("/simulation/state", get(simulation_state))
        .route("/simulation/history", get(history))
        .route("/simulation/reset", post(reset))
        .route("/database/stats", get(database_stats))
        .with_state(state)
}

/// Open the store, recover the simulation and build the router.
pub async fn build(config: &AppConfig) -> Result<Router> {
    let store = Arc::new(SqliteHistoryStore::open(&config.api.database_url)?);
    let rival = Arc::new(HttpRivalClient::new(&config.rival)?);
    tracing::info!("🧛 Rival endpoint: {}", rival.url());

    let simulation = Simulation::recover(config.model.params(), rival, store).await?;

    Ok(router(ApiState {
        simulation: Arc::new(simulation),
        port: config.api.port,
    }))
}

pub async fn run<F>(config: &AppConfig, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    tracing::info!("🚀 Starting {} (group {})", SERVICE_NAME, GROUP);
    let app = build(config).await?;
    super::serve(app, &config.api.host, config.api.port, shutdown).await
}

async fn health(State(state): State<ApiState>) -> Result<Json<Value>> {
    let history_len = state.simulation.history().await?.len();
    Ok(Json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "port": state.port,
        "group": GROUP,
        "history_len": history_len,
    })))
}

async fn population_size(State(state): State<ApiState>) -> Json<Value> {
    Json(json!({
        "taille": state.simulation.current_size().await,
        "species": GOLEM,
    }))
}

async fn growth_rate(State(state): State<ApiState>) -> Json<Value> {
    Json(json!({
        "taux_de_croissance": state.simulation.params().growth_rate,
        "species": GOLEM,
    }))
}

async fn competition(State(state): State<ApiState>) -> Json<Value> {
    Json(json!({
        "taux_de_competition": state.simulation.params().alpha,
        "species_i": GOLEM,
        "species_j": VAMPIRE,
    }))
}

async fn step(State(state): State<ApiState>) -> Result<Json<StepReport>> {
    let report = state.simulation.step().await?;
    tracing::debug!(
        "Step {}: golem={:.2} vampire={:.2} connected={}",
        report.time_step,
        report.taille,
        report.vampire,
        report.connected
    );
    Ok(Json(report))
}

async fn simulation_state(State(state): State<ApiState>) -> Json<SimulationState> {
    Json(state.simulation.state().await)
}

async fn history(State(state): State<ApiState>) -> Result<Json<HistoryResponse>> {
    Ok(Json(state.simulation.history().await?.into()))
}

async fn reset(State(state): State<ApiState>) -> Result<Json<Value>> {
    state.simulation.reset().await?;
    Ok(Json(json!({"success": true, "message": "Reset done"})))
}

async fn database_stats(State(state): State<ApiState>) -> Result<Json<Value>> {
    let records = state.simulation.history().await?.len();
    Ok(Json(json!({
        "database_path": state.simulation.store_location(),
        "records": records,
    })))
}
