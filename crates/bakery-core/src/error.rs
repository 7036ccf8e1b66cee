//! Unified error handling for Bakery Core.
//!
//! Wraps domain and application errors behind one type with a display
//! category and user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for Bakery Core operations.
#[derive(Debug, Error, Clone)]
pub enum BakeryError {
    /// Errors from the domain layer (bad options, invalid templates).
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Errors from the application layer (orchestration failures).
    #[error(transparent)]
    Application(#[from] ApplicationError),

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl BakeryError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Check your configuration file with: bakery config list".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in Bakery".into(),
                "Please report this issue at: https://github.com/bakery-rs/bakery/issues".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Configuration => ErrorCategory::Configuration,
                crate::domain::ErrorCategory::NotFound => ErrorCategory::NotFound,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// True for option values outside their domain, unknown options and
    /// invalid slugs: mistakes in what the operator asked for.
    pub fn is_option_error(&self) -> bool {
        matches!(
            self,
            Self::Domain(
                DomainError::InvalidOption { .. }
                    | DomainError::UnknownOption { .. }
                    | DomainError::InvalidProjectSlug { .. }
            )
        )
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type BakeryResult<T> = Result<T, BakeryError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn option_errors_are_recognised() {
        let err: BakeryError = DomainError::invalid_option("formatter", "yapf", &["Black"]).into();
        assert!(err.is_option_error());
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }

    #[test]
    fn domain_message_is_not_wrapped() {
        let err: BakeryError = DomainError::UnknownContent {
            id: "license:WTFPL".into(),
        }
        .into();
        assert_eq!(err.to_string(), "Unknown content reference: license:WTFPL");
        assert_eq!(err.category(), ErrorCategory::NotFound);
    }

    #[test]
    fn project_exists_is_a_validation_error() {
        let err: BakeryError = ApplicationError::ProjectExists {
            path: PathBuf::from("out/python_boilerplate"),
        }
        .into();
        assert!(!err.is_option_error());
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert!(err.suggestions().iter().any(|s| s.contains("output")));
    }
}
