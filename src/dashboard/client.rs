use crate::utils::error::{PopulationError, Result};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Headline numbers shown at the top of the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateView {
    pub golem: f64,
    pub vampire: f64,
    pub time: f64,
    pub connected: bool,
}

impl StateView {
    /// Read a state payload, accepting both the model's keys (`taille`,
    /// `vampire`, `temps`) and the API state keys.
    pub fn from_payload(payload: &Value) -> Self {
        Self {
            golem: number_or(payload, "taille", || population(payload, "Golem")),
            vampire: number_or(payload, "vampire", || population(payload, "Vampire")),
            time: number_or(payload, "temps", || {
                payload.get("time_step").and_then(Value::as_f64).unwrap_or(0.0)
            }),
            connected: payload
                .get("connected")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        }
    }
}

fn population(payload: &Value, species: &str) -> f64 {
    payload
        .get("populations")
        .and_then(|p| p.get(species))
        .and_then(Value::as_f64)
        .unwrap_or(0.0)
}

fn number_or(payload: &Value, key: &str, fallback: impl FnOnce() -> f64) -> f64 {
    payload.get(key).and_then(Value::as_f64).unwrap_or_else(fallback)
}

/// Thin client for the population API used by the dashboard.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json(&self, path: &str) -> Result<Value> {
        let url = self.url(path);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(PopulationError::ResponseError {
                url,
                message: format!("status {}", response.status()),
            });
        }
        Ok(response.json().await?)
    }

    async fn post(&self, path: &str) -> Result<()> {
        let url = self.url(path);
        let response = self.client.post(&url).send().await?;
        if !response.status().is_success() {
            return Err(PopulationError::ResponseError {
                url,
                message: format!("status {}", response.status()),
            });
        }
        Ok(())
    }

    pub async fn fetch_state(&self) -> Option<StateView> {
        match self.get_json("/simulation/state").await {
            Ok(payload) => Some(StateView::from_payload(&payload)),
            Err(e) => {
                tracing::debug!("State unavailable: {}", e);
                None
            }
        }
    }

    /// History records; a bare list and `{"history": [...]}` are both accepted.
    pub async fn fetch_history(&self) -> Vec<Value> {
        match self.get_json("/simulation/history").await {
            Ok(Value::Array(items)) => items,
            Ok(payload) => match payload.get("history") {
                Some(Value::Array(items)) => items.clone(),
                _ => Vec::new(),
            },
            Err(e) => {
                tracing::debug!("History unavailable: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn run_step(&self) -> bool {
        match self.post("/simulation/step").await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("⚠️ Could not run step: {}", e);
                false
            }
        }
    }

    pub async fn reset(&self) -> bool {
        match self.post("/simulation/reset").await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("⚠️ Could not reset simulation: {}", e);
                false
            }
        }
    }

    pub async fn is_healthy(&self) -> bool {
        self.get_json("/health").await.is_ok()
    }
}
