//! Error types with fix suggestions

use thiserror::Error;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

#[derive(Error, Debug)]
pub enum JobError {
    /// The symbol registry has no canonical key for an internal name.
    /// This is a configuration error, never a user error.
    #[error("Missing symbol: no canonical keyword registered for '{symbol}'")]
    MissingSymbol { symbol: String },

    #[error("Invalid keyword '{text}'")]
    InvalidKeyword { text: String },

    // ─────────────────────────────────────────────────────────────
    // Job definition errors
    // ─────────────────────────────────────────────────────────────

    #[error("{kind} entry #{index} is missing required field '{field}'")]
    MissingField {
        kind: &'static str,
        index: usize,
        field: &'static str,
    },

    #[error("{kind} entry #{index} has invalid '{field}': {details}")]
    InvalidField {
        kind: &'static str,
        index: usize,
        field: String,
        details: String,
    },

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Submission failed: {0}")]
    Submission(String),
}

impl FixSuggestion for JobError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            JobError::MissingSymbol { .. } => {
                Some("Register the symbol in the SymbolRegistry used for coercion")
            }
            JobError::InvalidKeyword { .. } => {
                Some("Keywords look like name or ns/name (letters, digits, - _ . ? ! * + < > =)")
            }
            JobError::MissingField { .. } => Some("Add the required field to the entry"),
            JobError::InvalidField { .. } => Some("Check the allowed values for this field"),
            JobError::YamlParse(_) => Some("Check YAML syntax: indentation and quoting"),
            JobError::JsonParse(_) => Some("Check JSON syntax"),
            JobError::Io(_) => Some("Check file path and permissions"),
            JobError::Submission(_) => {
                Some("Check that the engine is reachable and peers are running")
            }
        }
    }
}
