use crate::config::RivalConfig;
use crate::domain::model::RivalReading;
use crate::domain::ports::RivalSource;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

/// Reads the vampire population from the rival group's `/taille` endpoint.
#[derive(Debug, Clone)]
pub struct HttpRivalClient {
    client: Client,
    url: String,
    min_valid: f64,
}

impl HttpRivalClient {
    pub fn new(config: &RivalConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            url: config.url.clone(),
            min_valid: config.min_valid,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> Result<Option<f64>> {
        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            tracing::debug!("Rival answered with status {}", response.status());
            return Ok(None);
        }

        let body: Value = response.json().await?;
        Ok(extract_size(&body).filter(|value| *value > self.min_valid))
    }
}

/// Pull `taille` out of a rival payload. Some groups publish a list, in
/// which case the first element counts.
pub fn extract_size(body: &Value) -> Option<f64> {
    let value = match body.get("taille")? {
        Value::Array(items) => items.first()?,
        other => other,
    };

    let size = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    size.filter(|v| v.is_finite())
}

#[async_trait]
impl RivalSource for HttpRivalClient {
    async fn vampire_size(&self, fallback: f64) -> RivalReading {
        match self.fetch().await {
            Ok(Some(value)) => RivalReading::online(value),
            Ok(None) => RivalReading::offline(fallback),
            Err(e) => {
                tracing::debug!("Rival offline ({}), using simulated value", e);
                RivalReading::offline(fallback)
            }
        }
    }
}
