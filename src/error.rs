//! Error types with fix suggestions

use thiserror::Error;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

#[derive(Error, Debug)]
pub enum StateError {
    // ─────────────────────────────────────────────────────────────
    // Typed access (STATE-001)
    // ─────────────────────────────────────────────────────────────

    #[error("STATE-001: Value at '{key}' is {found}, not {expected}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    // ─────────────────────────────────────────────────────────────
    // Seeding (STATE-010 to STATE-011)
    // ─────────────────────────────────────────────────────────────

    #[error("STATE-010: Invalid seed document: {details}")]
    InvalidSeed { details: String },

    #[error("STATE-011: Invalid assignment '{input}' (expected key=value)")]
    InvalidAssignment { input: String },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StateError {
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, StateError::TypeMismatch { .. })
    }
}

impl FixSuggestion for StateError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            StateError::TypeMismatch { .. } => {
                Some("Read the value with the accessor matching its stored type, or use get()")
            }
            StateError::InvalidSeed { .. } => Some("Seed documents must be a single object at top level"),
            StateError::InvalidAssignment { .. } => Some("Use --set key=value with a non-empty key"),
            StateError::Json(_) => Some("Check JSON syntax (try parsing with jq)"),
            StateError::Yaml(_) => Some("Check YAML syntax: indentation and quoting"),
            StateError::Io(_) => Some("Check file path and permissions"),
        }
    }
}
