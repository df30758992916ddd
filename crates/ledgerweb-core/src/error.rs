//! Error types for ledgerweb-core
//!
//! Row-level validation problems are not errors here: they travel as flags on
//! the echoed input form. Everything in this module is fatal for the request.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Storage backend failure
    StoreError,
    /// A key or identifier could not be interpreted
    InvalidKey,
    /// Internal error
    InternalError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::StoreError => write!(f, "STORE_ERROR"),
            ErrorCode::InvalidKey => write!(f, "INVALID_KEY"),
            ErrorCode::InternalError => write!(f, "INTERNAL_ERROR"),
        }
    }
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Failure reported by a [`crate::store::LedgerStore`] implementation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Store backend error: {message}")]
    Backend { message: String },

    #[error("Store lock poisoned")]
    Poisoned,

    #[error("Invalid key: {key}")]
    InvalidKey { key: String },
}

/// Main error type for ledgerweb-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

impl CoreError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::Store(StoreError::InvalidKey { .. }) => ErrorCode::InvalidKey,
            CoreError::Store(_) => ErrorCode::StoreError,
            CoreError::InternalError { .. } => ErrorCode::InternalError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::Store(StoreError::InvalidKey { .. }) => ErrorSeverity::Warning,
            CoreError::Store(_) => ErrorSeverity::Error,
            CoreError::InternalError { .. } => ErrorSeverity::Critical,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::Store(StoreError::Backend { message }) => details
                .with_detail(serde_json::json!({ "store_message": message }))
                .with_suggestion("Nothing from this request was written; retry the submission.".to_string()),
            CoreError::Store(StoreError::Poisoned) => details
                .with_suggestion("Restart the server.".to_string()),
            _ => details,
        }
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

/// Error context for reporting
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Operation being performed
    pub operation: String,
    /// Additional context data
    pub data: serde_json::Value,
}

impl ErrorContext {
    pub fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
            data: serde_json::json!({}),
        }
    }

    pub fn with_data(mut self, key: &str, value: serde_json::Value) -> Self {
        self.data[key] = value;
        self
    }
}

/// Error logger trait
pub trait ErrorLogger: Send + Sync {
    fn log_error(&self, error: &CoreError, context: &ErrorContext);
}

/// Default error logger using log crate
#[derive(Default)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext) {
        log::error!(
            target: "ledgerweb::error",
            "ERROR [{}] {} - Operation: {} - Data: {}",
            error.code(),
            error.to_details(),
            context.operation,
            context.data
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::StoreError.to_string(), "STORE_ERROR");
        assert_eq!(ErrorCode::InvalidKey.to_string(), "INVALID_KEY");
    }

    #[test]
    fn test_store_error_maps_to_code() {
        let error: CoreError = StoreError::Backend { message: "disk full".to_string() }.into();
        assert_eq!(error.code(), ErrorCode::StoreError);
        assert_eq!(error.severity(), ErrorSeverity::Error);
        assert_eq!(error.to_string(), "Store backend error: disk full");

        let error: CoreError = StoreError::InvalidKey { key: "x".to_string() }.into();
        assert_eq!(error.code(), ErrorCode::InvalidKey);
        assert_eq!(error.severity(), ErrorSeverity::Warning);
    }

    #[test]
    fn test_internal_error_is_critical() {
        let error = CoreError::InternalError { message: "overflow".to_string() };
        assert_eq!(error.code(), ErrorCode::InternalError);
        assert_eq!(error.severity(), ErrorSeverity::Critical);
        assert!(error.to_details().suggestions.is_empty());
        assert_eq!(error.to_details().to_string(), "[INTERNAL_ERROR] Internal error: overflow");
    }

    #[test]
    fn test_error_details_store_backend() {
        let error: CoreError = StoreError::Backend { message: "locked".to_string() }.into();
        let details = error.to_details();
        assert!(details.details.is_some());
        assert!(!details.suggestions.is_empty());
        assert!(details.to_string().contains("[STORE_ERROR]"));
    }

    #[test]
    fn test_error_context() {
        let context = ErrorContext::new("insert").with_data("rows", serde_json::json!(3));
        assert_eq!(context.operation, "insert");
        assert_eq!(context.data["rows"], 3);
    }
}
