//! Unified error hierarchy for TrainRx
//!
//! Hard failures from the pure estimator formulas are typed so callers can
//! decide whether to fall back to a lower-fidelity data source. Implausible
//! but computable results are never errors: they travel as warnings on the
//! result itself.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for all TrainRx operations
#[derive(Debug, Error)]
pub enum TrainRxError {
    /// Threshold estimator failures (malformed numeric input)
    #[error("Estimator error: {0}")]
    Estimator(#[from] EstimatorError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// Scheduling parameter validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failures raised by the threshold estimators
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EstimatorError {
    /// A numeric input was non-positive, non-finite or otherwise unusable
    #[error("Invalid parameter for {calculation}: {parameter}={value}")]
    InvalidParameter {
        calculation: String,
        parameter: String,
        value: String,
    },

    /// Race distance label that the oxygen-cost model does not know
    #[error("Unrecognized race distance: {label}")]
    UnrecognizedDistance { label: String },

    /// Fixed-window tests need a minimum number of samples
    #[error("Insufficient data for {calculation}: need {required}, got {actual}")]
    InsufficientData {
        calculation: String,
        required: usize,
        actual: usize,
    },

    /// Regression input that cannot be solved (e.g. all trials share one duration)
    #[error("Cannot fit {calculation}: {reason}")]
    Singular { calculation: String, reason: String },
}

impl EstimatorError {
    pub(crate) fn invalid(calculation: &str, parameter: &str, value: impl ToString) -> Self {
        EstimatorError::InvalidParameter {
            calculation: calculation.to_string(),
            parameter: parameter.to_string(),
            value: value.to_string(),
        }
    }

    pub(crate) fn insufficient(calculation: &str, required: usize, actual: usize) -> Self {
        EstimatorError::InsufficientData {
            calculation: calculation.to_string(),
            required,
            actual,
        }
    }
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("Failed to read config file {path}: {reason}")]
    Unreadable { path: PathBuf, reason: String },

    /// TOML did not parse
    #[error("Invalid TOML: {0}")]
    Parse(String),

    /// Parsed but semantically invalid
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Result type alias for TrainRx operations
pub type Result<T> = std::result::Result<T, TrainRxError>;

impl TrainRxError {
    /// Whether a caller should fall back to a lower-fidelity input
    pub fn is_recoverable(&self) -> bool {
        matches!(self, TrainRxError::Estimator(_))
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TrainRxError::Estimator(_) => ErrorSeverity::Warning,
            TrainRxError::Validation(_) => ErrorSeverity::Warning,
            TrainRxError::Configuration(_) => ErrorSeverity::Error,
            TrainRxError::Io(_) => ErrorSeverity::Error,
            TrainRxError::Internal(_) => ErrorSeverity::Critical,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            TrainRxError::Estimator(EstimatorError::UnrecognizedDistance { label }) => {
                format!("'{}' is not a race distance we can use for pace estimation", label)
            }
            TrainRxError::Estimator(EstimatorError::InsufficientData { calculation, .. }) => {
                format!(
                    "Not enough data to calculate {}. Please repeat the test with a complete recording.",
                    calculation
                )
            }
            TrainRxError::Configuration(ConfigError::Unreadable { path, .. }) => {
                format!("Could not read configuration file: {}", path.display())
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Critical system error requiring immediate attention
    Critical,
    /// Error that prevents operation but system can continue
    Error,
    /// Warning that doesn't prevent operation
    Warning,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Critical => tracing::Level::ERROR,
            ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
        }
    }
}
