use crate::domain::model::Feature;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PricerError {
    #[error("Index {index} is out of range for {feature} (valid range 0..{count})")]
    CatalogOutOfRange {
        feature: Feature,
        index: usize,
        count: usize,
    },

    #[error("Prediction model unavailable: {reason}")]
    ModelUnavailable { reason: String },

    #[error("Model rejected input: {message}")]
    InferenceError { message: String },

    #[error("Contract violation: {message}")]
    ContractViolation { message: String },

    #[error("Invalid catalog for {feature}: {reason}")]
    InvalidCatalog { feature: Feature, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Selection,
    Model,
    Internal,
    Configuration,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PricerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PricerError::CatalogOutOfRange { .. } => ErrorCategory::Selection,
            PricerError::ModelUnavailable { .. } | PricerError::InferenceError { .. } => {
                ErrorCategory::Model
            }
            PricerError::ContractViolation { .. } => ErrorCategory::Internal,
            PricerError::InvalidCatalog { .. }
            | PricerError::MissingConfigError { .. }
            | PricerError::ConfigValidationError { .. }
            | PricerError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            PricerError::IoError(_)
            | PricerError::SerializationError(_)
            | PricerError::CsvError(_) => ErrorCategory::Io,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            PricerError::CatalogOutOfRange { .. } | PricerError::InferenceError { .. } => {
                ErrorSeverity::Medium
            }
            PricerError::ModelUnavailable { .. }
            | PricerError::InvalidCatalog { .. }
            | PricerError::MissingConfigError { .. }
            | PricerError::ConfigValidationError { .. }
            | PricerError::InvalidConfigValueError { .. } => ErrorSeverity::High,
            PricerError::ContractViolation { .. }
            | PricerError::IoError(_)
            | PricerError::SerializationError(_)
            | PricerError::CsvError(_) => ErrorSeverity::Critical,
        }
    }

    /// 只中止單次預測週期、回報給 UI 而不結束程序的錯誤
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PricerError::CatalogOutOfRange { .. }
                | PricerError::ModelUnavailable { .. }
                | PricerError::InferenceError { .. }
        )
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            PricerError::CatalogOutOfRange { feature, count, .. } => {
                format!("Pick a {} option between 0 and {}", feature, count.saturating_sub(1))
            }
            PricerError::ModelUnavailable { .. } => {
                "Check that the model artifact exists and is a valid linear_regression document"
                    .to_string()
            }
            PricerError::InferenceError { .. } => {
                "Choose values inside the range the model was trained on".to_string()
            }
            PricerError::ContractViolation { .. } => {
                "This is a bug in how the pricer is wired; please report it".to_string()
            }
            PricerError::InvalidCatalog { feature, .. } => {
                format!("Fix the [catalog.{}] table in the configuration", feature.config_key())
            }
            PricerError::MissingConfigError { field } => {
                format!("Set '{}' in the configuration file or environment", field)
            }
            PricerError::ConfigValidationError { field, .. }
            | PricerError::InvalidConfigValueError { field, .. } => {
                format!("Review the '{}' setting in the configuration file", field)
            }
            PricerError::IoError(_) => "Check file paths and permissions".to_string(),
            PricerError::SerializationError(_) => {
                "Make sure the model artifact is well-formed JSON".to_string()
            }
            PricerError::CsvError(_) => "Check that the output file is writable".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            PricerError::CatalogOutOfRange { .. }
            | PricerError::ModelUnavailable { .. }
            | PricerError::InferenceError { .. } => format!("Price unavailable: {}", self),
            PricerError::ContractViolation { .. } => format!("Internal error: {}", self),
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PricerError>;
