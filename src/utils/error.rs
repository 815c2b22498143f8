use thiserror::Error;

#[derive(Error, Debug)]
pub enum PopulationError {
    #[error("HTTP request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Database error: {message}")]
    DatabaseError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Server error: {message}")]
    ServerError { message: String },

    #[error("Unexpected response from {url}: {message}")]
    ResponseError { url: String, message: String },

    #[error("Service at {url} not ready after {attempts} attempts")]
    NotReadyError { url: String, attempts: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Storage,
    Configuration,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PopulationError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ApiError(_) | Self::ResponseError { .. } | Self::NotReadyError { .. } => {
                ErrorCategory::Network
            }
            Self::DatabaseError { .. } => ErrorCategory::Storage,
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            Self::SerializationError(_) => ErrorCategory::Data,
            Self::IoError(_) | Self::ServerError { .. } => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 網路問題通常可以重試
            Self::ApiError(_) | Self::ResponseError { .. } | Self::NotReadyError { .. } => {
                ErrorSeverity::Medium
            }
            Self::SerializationError(_)
            | Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorSeverity::High,
            Self::DatabaseError { .. } | Self::IoError(_) | Self::ServerError { .. } => {
                ErrorSeverity::Critical
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ApiError(e) if e.is_timeout() => "A remote service did not answer in time".to_string(),
            Self::ApiError(_) => "Could not reach a remote service".to_string(),
            Self::ResponseError { url, .. } => format!("Service at {} answered unexpectedly", url),
            Self::NotReadyError { url, attempts } => {
                format!("Service at {} did not become healthy ({} attempts)", url, attempts)
            }
            Self::DatabaseError { message } => format!("Population history unavailable: {}", message),
            Self::ConfigError { message } => format!("Invalid configuration: {}", message),
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid configuration for '{}': {}", field, reason)
            }
            Self::SerializationError(_) => "Received malformed JSON data".to_string(),
            Self::IoError(e) => format!("File system or socket error: {}", e),
            Self::ServerError { message } => format!("Server failed: {}", message),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check that the target service is running and the URL is correct",
            ErrorCategory::Storage => "Check the database path permissions or run `golem clean` to start fresh",
            ErrorCategory::Configuration => "Review golem.toml and the GOLEM_* environment variables",
            ErrorCategory::Data => "Verify the remote service speaks the expected JSON format",
            ErrorCategory::System => "Check that the port is free and the process has enough permissions",
        }
    }
}

impl From<diesel::result::Error> for PopulationError {
    fn from(e: diesel::result::Error) -> Self {
        Self::DatabaseError {
            message: e.to_string(),
        }
    }
}

impl From<diesel::r2d2::PoolError> for PopulationError {
    fn from(e: diesel::r2d2::PoolError) -> Self {
        Self::DatabaseError {
            message: format!("connection pool: {}", e),
        }
    }
}

pub type Result<T> = std::result::Result<T, PopulationError>;
