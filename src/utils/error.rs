use thiserror::Error;

#[derive(Error, Debug)]
pub enum MigrateError {
    #[error("HTTP request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Failed to fetch comment page for bug {bug_id}: {message}")]
    ScrapeError { bug_id: String, message: String },

    #[error("Command '{command}' failed: {message}")]
    CommandError { command: String, message: String },

    #[error("Unexpected response: {message}")]
    ResponseError { message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl MigrateError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            MigrateError::ConfigError { .. }
            | MigrateError::InvalidConfigValueError { .. }
            | MigrateError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            MigrateError::ApiError(_)
            | MigrateError::ScrapeError { .. }
            | MigrateError::ResponseError { .. } => ErrorCategory::Network,
            MigrateError::CsvError(_)
            | MigrateError::SerializationError(_)
            | MigrateError::ProcessingError { .. } => ErrorCategory::Data,
            MigrateError::IoError(_) | MigrateError::CommandError { .. } => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            MigrateError::ApiError(_) | MigrateError::ScrapeError { .. } => {
                "Check network connectivity and that the tracker URL is reachable"
            }
            MigrateError::ResponseError { .. } => {
                "Check the target tracker logs and the credentials in use"
            }
            MigrateError::CsvError(_) => {
                "Make sure the CSV export has a header row with the expected column names"
            }
            MigrateError::IoError(_) => "Check that the input file exists and the output directory is writable",
            MigrateError::SerializationError(_) | MigrateError::ProcessingError { .. } => {
                "Inspect the offending record; run with --verbose for details"
            }
            MigrateError::CommandError { .. } => {
                "Make sure the HTTP client binary is installed and on PATH, or use --transport http"
            }
            MigrateError::ConfigError { .. }
            | MigrateError::InvalidConfigValueError { .. }
            | MigrateError::ConfigValidationError { .. } => {
                "Fix the configuration file or command-line flags and retry"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Network => format!("Network problem: {}", self),
            ErrorCategory::Data => format!("Input data problem: {}", self),
            ErrorCategory::System => format!("System problem: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, MigrateError>;
