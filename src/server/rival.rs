use crate::config::AppConfig;
use crate::core::lotka_volterra::unix_seconds;
use crate::utils::error::Result;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::future::Future;

/// Oscillating vampire population, `800 ± 300`.
pub fn simulated_rival_size(t: f64) -> f64 {
    800.0 + 300.0 * (t * 0.5).sin()
}

pub fn router() -> Router {
    Router::new()
        .route("/taille", get(size))
        .route("/health", get(|| async { Json(json!({"status": "healthy"})) }))
}

pub async fn run<F>(config: &AppConfig, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    tracing::info!("🧛 Starting rival simulator");
    super::serve(router(), &config.rival.host, config.rival.port, shutdown).await
}

async fn size() -> Json<Value> {
    Json(json!({"taille": simulated_rival_size(unix_seconds())}))
}
