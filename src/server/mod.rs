//! HTTP servers: population API, dashboard and the rival simulator.

pub mod api;
pub mod dashboard;
pub mod rival;

use crate::utils::error::{ErrorCategory, PopulationError, Result};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::json;
use std::future::Future;
use tokio::net::TcpListener;

/// Bind `host:port` and serve `app` until `shutdown` resolves.
pub async fn serve<F>(app: Router, host: &str, port: u16, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| PopulationError::ServerError {
            message: format!("cannot bind {}: {}", addr, e),
        })?;

    tracing::info!("🌐 Listening on http://{}", addr);
    serve_on(listener, app, shutdown).await
}

pub async fn serve_on<F>(listener: TcpListener, app: Router, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// Resolves on ctrl-c.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Cannot listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("🛑 Shutdown requested");
}

impl IntoResponse for PopulationError {
    fn into_response(self) -> Response {
        tracing::error!("❌ Request failed: {}", self);

        let status = match self.category() {
            ErrorCategory::Network => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(json!({
            "error": format!("{:?}", self.category()),
            "message": self.user_friendly_message(),
        }));

        (status, body).into_response()
    }
}
