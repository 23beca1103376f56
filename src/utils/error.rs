use thiserror::Error;

#[derive(Error, Debug)]
pub enum InsightsError {
    #[error("HTTP client error: {0}")]
    HttpClientError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Io,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl InsightsError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            InsightsError::HttpClientError(_) => ErrorCategory::Network,
            InsightsError::IoError(_) => ErrorCategory::Io,
            InsightsError::SerializationError(_) => ErrorCategory::Data,
            InsightsError::ConfigError { .. }
            | InsightsError::ConfigValidationError { .. }
            | InsightsError::InvalidConfigValueError { .. }
            | InsightsError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            InsightsError::HttpClientError(_) => {
                "Check TLS/proxy settings of the host; the HTTP client could not be built"
            }
            InsightsError::IoError(_) => "Check that the output path exists and is writable",
            InsightsError::SerializationError(_) => {
                "Report this issue; the profile could not be serialized"
            }
            InsightsError::ConfigError { .. }
            | InsightsError::ConfigValidationError { .. } => {
                "Review the TOML config file against config/insights.example.toml"
            }
            InsightsError::InvalidConfigValueError { .. } => {
                "Fix the highlighted value in the config file or CLI arguments"
            }
            InsightsError::MissingConfigError { .. } => {
                "Provide the missing field in the config file or environment"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            InsightsError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting '{}': {}", field, reason)
            }
            InsightsError::MissingConfigError { field } => {
                format!("Missing setting '{}'", field)
            }
            InsightsError::IoError(e) => format!("Could not write output: {}", e),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, InsightsError>;
