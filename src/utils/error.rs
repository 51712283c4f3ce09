use thiserror::Error;

#[derive(Error, Debug)]
pub enum CurError {
    #[error("Pricing request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid glob pattern: {0}")]
    PatternError(#[from] glob::PatternError),

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

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("No input files matched: {pattern}")]
    NoInputFiles { pattern: String },

    #[error("Column '{column}' not found in {file}")]
    MissingColumn { column: String, file: String },

    #[error("Pricing data not found: {message}")]
    PricingNotFound { message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Input,
    Configuration,
    Pricing,
    Processing,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CurError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CurError::ApiError(_) => ErrorCategory::Network,
            CurError::CsvError(_)
            | CurError::PatternError(_)
            | CurError::NoInputFiles { .. }
            | CurError::MissingColumn { .. } => ErrorCategory::Input,
            CurError::ConfigError { .. }
            | CurError::ConfigValidationError { .. }
            | CurError::InvalidConfigValueError { .. }
            | CurError::MissingConfigError { .. } => ErrorCategory::Configuration,
            CurError::PricingNotFound { .. } => ErrorCategory::Pricing,
            CurError::SerializationError(_)
            | CurError::ProcessingError { .. } => ErrorCategory::Processing,
            CurError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 網路錯誤通常重試即可
            CurError::ApiError(_) => ErrorSeverity::Medium,
            CurError::PricingNotFound { .. } => ErrorSeverity::Medium,
            CurError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            CurError::ApiError(_) => {
                "Check network connectivity to the AWS pricing endpoint and retry".to_string()
            }
            CurError::CsvError(_) => "Make sure the input is a valid CUR CSV export".to_string(),
            CurError::PatternError(_) | CurError::NoInputFiles { .. } => {
                "Check the input path or glob pattern".to_string()
            }
            CurError::MissingColumn { column, .. } => format!(
                "Export the CUR data with a '{}' column (month, aws_account_id, usage_type, item_description, cost)",
                column
            ),
            CurError::ConfigError { .. }
            | CurError::ConfigValidationError { .. }
            | CurError::InvalidConfigValueError { .. }
            | CurError::MissingConfigError { .. } => {
                "Fix the configuration file or command-line options".to_string()
            }
            CurError::PricingNotFound { .. } => {
                "Check the instance type, region, and Savings Plans parameters".to_string()
            }
            CurError::IoError(_) => "Check file permissions and available disk space".to_string(),
            CurError::SerializationError(_)
            | CurError::ProcessingError { .. } => "Re-run with --verbose for details".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CurError::ApiError(e) => match e.status() {
                Some(status) => format!("The pricing service answered with HTTP {}", status),
                None => "Could not reach the pricing service".to_string(),
            },
            CurError::NoInputFiles { pattern } => format!("No CSV files found for '{}'", pattern),
            CurError::MissingColumn { column, file } => {
                format!("'{}' has no '{}' column", file, column)
            }
            CurError::PricingNotFound { message } => format!("No pricing data: {}", message),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CurError>;
