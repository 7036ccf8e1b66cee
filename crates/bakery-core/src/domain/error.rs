// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (so services can log and return them)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Configuration Errors (option outside its domain)
    // ========================================================================
    #[error("invalid value '{value}' for option '{option}'; allowed: {}", allowed.join(", "))]
    InvalidOption {
        option: String,
        value: String,
        allowed: Vec<String>,
    },

    #[error("unknown option '{option}'; known options: {}", known.join(", "))]
    UnknownOption { option: String, known: Vec<String> },

    #[error("invalid project slug '{slug}': {reason}")]
    InvalidProjectSlug { slug: String, reason: String },

    // ========================================================================
    // Template Errors
    // ========================================================================
    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    #[error("Template '{template_id}' has no content")]
    EmptyTemplate { template_id: String },

    #[error("Duplicate path in template: {path}")]
    DuplicatePath { path: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("Unknown content reference: {id}")]
    UnknownContent { id: String },

    // ========================================================================
    // Constraint Violations
    // ========================================================================
    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },
}

impl DomainError {
    /// Shorthand for an [`DomainError::InvalidOption`] built from a static domain.
    pub fn invalid_option(option: &str, value: &str, allowed: &[&str]) -> Self {
        Self::InvalidOption {
            option: option.to_string(),
            value: value.to_string(),
            allowed: allowed.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidOption {
                option, allowed, ..
            } => {
                let mut out = vec![format!("Allowed values for '{option}':")];
                out.extend(allowed.iter().map(|v| format!("  • {v}")));
                out.push("Try: bakery options".into());
                out
            }
            Self::UnknownOption { known, .. } => vec![
                format!("Known options: {}", known.join(", ")),
                "Pass overrides as --set KEY=VALUE".into(),
            ],
            Self::InvalidProjectSlug { .. } => vec![
                "A project slug must be a valid Python module name".into(),
                "Use letters, digits and underscores, starting with a letter or '_'".into(),
                "Example: --project-slug my_package".into(),
            ],
            Self::EmptyTemplate { template_id } => vec![
                format!("Template '{}' is corrupted", template_id),
                "Please report this issue or use a different template".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidOption { .. }
            | Self::UnknownOption { .. }
            | Self::InvalidProjectSlug { .. } => ErrorCategory::Configuration,
            Self::InvalidTemplate(_)
            | Self::EmptyTemplate { .. }
            | Self::DuplicatePath { .. }
            | Self::AbsolutePathNotAllowed { .. } => ErrorCategory::Validation,
            Self::UnknownContent { .. } => ErrorCategory::NotFound,
            Self::MissingRequiredField { .. } => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Configuration,
    NotFound,
    Internal,
}
