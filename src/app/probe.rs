use crate::config::ProbeConfig;
use crate::utils::error::{PopulationError, Result};
use reqwest::Client;
use std::time::Duration;

/// Liveness probe policy: how often, how long to wait, how many retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Probe {
    pub interval: Duration,
    pub timeout: Duration,
    pub retries: u32,
}

impl Default for Probe {
    fn default() -> Self {
        Self::from_config(&ProbeConfig::default())
    }
}

impl Probe {
    pub fn from_config(config: &ProbeConfig) -> Self {
        Self {
            interval: Duration::from_secs(config.interval_secs),
            timeout: Duration::from_secs(config.timeout_secs),
            retries: config.retries,
        }
    }

    /// Tight policy for local startup ordering, roughly ten seconds in total.
    pub fn startup() -> Self {
        Self {
            interval: Duration::from_millis(250),
            timeout: Duration::from_secs(1),
            retries: 40,
        }
    }

    fn client(&self) -> Result<Client> {
        Ok(Client::builder().timeout(self.timeout).build()?)
    }

    /// Single GET; healthy iff the status is 2xx.
    pub async fn check(&self, url: &str) -> Result<()> {
        check_with(&self.client()?, url).await
    }

    /// Poll `url` until it is healthy. Gives up after `retries + 1` failed
    /// attempts spaced by `interval`. Returns the number of attempts used.
    pub async fn wait_until_ready(&self, url: &str) -> Result<u32> {
        let client = self.client()?;
        let attempts = self.retries + 1;

        for attempt in 1..=attempts {
            match check_with(&client, url).await {
                Ok(()) => {
                    tracing::info!("✅ {} healthy after {} attempt(s)", url, attempt);
                    return Ok(attempt);
                }
                Err(e) => {
                    tracing::debug!("Attempt {}/{} for {}: {}", attempt, attempts, url, e);
                    if attempt < attempts {
                        tokio::time::sleep(self.interval).await;
                    }
                }
            }
        }

        Err(PopulationError::NotReadyError {
            url: url.to_string(),
            attempts,
        })
    }
}

async fn check_with(client: &Client, url: &str) -> Result<()> {
    let response = client.get(url).send().await?;
    if response.status().is_success() {
        Ok(())
    } else {
        Err(PopulationError::ResponseError {
            url: url.to_string(),
            message: format!("status {}", response.status()),
        })
    }
}
