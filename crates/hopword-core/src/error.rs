//! Error types with actionable suggestions.
//!
//! [`ApiError`] is the user-facing error: configuration and input problems
//! that a person can fix, always paired with a hint. [`SessionError`] covers
//! failures of the interactive loop's collaborators (renderer, jumper, key
//! source).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error codes for user-facing errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidConfig,
    InvalidInput,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::InvalidConfig => write!(f, "INVALID_CONFIG"),
            ErrorCode::InvalidInput => write!(f, "INVALID_INPUT"),
        }
    }
}

/// An error with a code, a message and a hint on how to fix it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
    pub suggestion: Option<String>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (hint: {})", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::InvalidConfig,
            message: message.into(),
            suggestion: Some("Run 'hopword config' to inspect the effective configuration".into()),
        }
    }

    /// A word or filter pattern that the regex engine rejected.
    pub fn invalid_pattern(pattern: &str, error: &str) -> Self {
        Self {
            code: ErrorCode::InvalidConfig,
            message: format!("Invalid pattern '{}': {}", pattern, error),
            suggestion: Some(
                "Patterns use Rust regex syntax; escape backslashes in JSON (\"\\\\w+\")".into(),
            ),
        }
    }

    pub fn unknown_matcher(name: &str) -> Self {
        Self {
            code: ErrorCode::InvalidConfig,
            message: format!("Unknown matcher '{}'", name),
            suggestion: Some(
                "Valid matchers are 'fuzzy' and 'transliteration' (or 'linear')".into(),
            ),
        }
    }

    pub fn empty_label(index: usize) -> Self {
        Self {
            code: ErrorCode::InvalidConfig,
            message: format!("Label #{} is empty", index + 1),
            suggestion: Some("Every label must be a non-empty string such as \"a\"".into()),
        }
    }

    pub fn duplicate_label(label: char) -> Self {
        Self {
            code: ErrorCode::InvalidConfig,
            message: format!("Label '{}' appears more than once", label),
            suggestion: Some(format!(
                "Remove the repeated '{}' so every label key maps to one target",
                label
            )),
        }
    }

    /// Create an invalid input error with a custom suggestion.
    pub fn invalid_input_with_suggestion(
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self {
            code: ErrorCode::InvalidInput,
            message: message.into(),
            suggestion: Some(suggestion.into()),
        }
    }
}

/// Failure raised while a navigation session is running.
///
/// Whatever the variant, the session tears down its marks and prompt before
/// the error reaches the caller.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("render failed: {0}")]
    Render(String),
    #[error("jump failed: {0}")]
    Jump(String),
    #[error("reading input failed: {0}")]
    Input(#[from] std::io::Error),
}
