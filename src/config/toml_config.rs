use crate::domain::model::{
    ModelParams, DEFAULT_ALPHA, DEFAULT_CARRYING_CAPACITY, DEFAULT_GROWTH_RATE,
    DEFAULT_INITIAL_SIZE, DEFAULT_VAMPIRE_SIM_CAPACITY,
};
use crate::utils::error::{PopulationError, Result};
use crate::utils::validation::{
    validate_path, validate_positive_number, validate_range, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const API_PORT: u16 = 16050;
pub const DASHBOARD_PORT: u16 = 8501;
pub const RIVAL_PORT: u16 = 16040;

/// Whole-process configuration. Each service reads only its own section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub model: ModelConfig,
    pub rival: RivalConfig,
    pub dashboard: DashboardConfig,
    pub probe: ProbeConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: API_PORT,
            database_url: "population_data.db".to_string(),
        }
    }
}

impl ApiConfig {
    /// Loopback health URL, the one a container probe hits.
    pub fn health_url(&self) -> String {
        format!("http://127.0.0.1:{}/health", self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub growth_rate: f64,
    pub carrying_capacity: f64,
    pub alpha: f64,
    pub initial_size: f64,
    pub vampire_sim_capacity: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            growth_rate: DEFAULT_GROWTH_RATE,
            carrying_capacity: DEFAULT_CARRYING_CAPACITY,
            alpha: DEFAULT_ALPHA,
            initial_size: DEFAULT_INITIAL_SIZE,
            vampire_sim_capacity: DEFAULT_VAMPIRE_SIM_CAPACITY,
        }
    }
}

impl ModelConfig {
    pub fn params(&self) -> ModelParams {
        ModelParams {
            growth_rate: self.growth_rate,
            carrying_capacity: self.carrying_capacity,
            alpha: self.alpha,
            initial_size: self.initial_size,
            vampire_sim_capacity: self.vampire_sim_capacity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RivalConfig {
    /// Rival group's population endpoint.
    pub url: String,
    pub timeout_ms: u64,
    /// Readings at or below this are treated as "no data".
    pub min_valid: f64,
    /// Bind address of the local rival simulator.
    pub host: String,
    pub port: u16,
}

impl Default for RivalConfig {
    fn default() -> Self {
        Self {
            url: format!("http://127.0.0.1:{}/taille", RIVAL_PORT),
            timeout_ms: 500,
            min_valid: 0.1,
            host: "0.0.0.0".to_string(),
            port: RIVAL_PORT,
        }
    }
}

impl RivalConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub host: String,
    pub port: u16,
    pub api_url: String,
    pub refresh_interval_secs: u64,
    /// Run one simulation step on every refresh.
    pub auto_step: bool,
    pub request_timeout_ms: u64,
    /// When false, print the browser URL on start.
    pub headless: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DASHBOARD_PORT,
            api_url: format!("http://localhost:{}", API_PORT),
            refresh_interval_secs: 5,
            auto_step: true,
            request_timeout_ms: 1000,
            headless: true,
        }
    }
}

impl DashboardConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn health_url(&self) -> String {
        format!("http://127.0.0.1:{}/health", self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub interval_secs: u64,
    pub timeout_secs: u64,
    pub retries: u32,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            interval_secs: 30,
            timeout_secs: 5,
            retries: 3,
        }
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PopulationError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Load `path` when it exists, otherwise start from defaults; then apply
    /// `GOLEM_*` environment overrides.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            tracing::info!("📁 Loading configuration from: {}", path.display());
            Self::from_file(path)?
        } else {
            tracing::debug!("No config file at {}, using defaults", path.display());
            Self::default()
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("GOLEM_API_URL") {
            self.dashboard.api_url = url;
        }
        if let Some(url) = lookup("GOLEM_RIVAL_URL") {
            self.rival.url = url;
        }
        if let Some(db) = lookup("GOLEM_DATABASE_URL") {
            self.api.database_url = db;
        }
    }

    /// 替換環境變數 (例如 ${RIVAL_HOST})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PopulationError::ConfigError {
            message: format!("env pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_path("api.database_url", &self.api.database_url)?;

        validate_range("model.growth_rate", self.model.growth_rate, -10.0, 10.0)?;
        validate_range("model.carrying_capacity", self.model.carrying_capacity, 0.0, f64::MAX)?;
        validate_range("model.alpha", self.model.alpha, 0.0, 100.0)?;
        validate_range("model.initial_size", self.model.initial_size, 0.0, f64::MAX)?;
        validate_range(
            "model.vampire_sim_capacity",
            self.model.vampire_sim_capacity,
            0.0,
            f64::MAX,
        )?;

        validate_url("rival.url", &self.rival.url)?;
        validate_positive_number("rival.timeout_ms", self.rival.timeout_ms, 1)?;

        validate_url("dashboard.api_url", &self.dashboard.api_url)?;
        validate_positive_number(
            "dashboard.refresh_interval_secs",
            self.dashboard.refresh_interval_secs,
            1,
        )?;
        validate_positive_number(
            "dashboard.request_timeout_ms",
            self.dashboard.request_timeout_ms,
            1,
        )?;

        validate_positive_number("probe.interval_secs", self.probe.interval_secs, 1)?;
        validate_positive_number("probe.timeout_secs", self.probe.timeout_secs, 1)?;

        Ok(())
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
