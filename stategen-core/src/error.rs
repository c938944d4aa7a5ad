//! Core error types.

use thiserror::Error;

/// Errors from configuring or driving the grammar engine.
///
/// Malformed input never surfaces here; it is recorded in the
/// [`ParseReport`](crate::ParseReport) instead.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid grammar policy: {reason}")]
    InvalidPolicy { reason: String },

    #[error("pattern error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed transition record: '{record}'")]
    MalformedRecord { record: String },
}

impl CoreError {
    /// Returns a stable error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            CoreError::InvalidPolicy { .. } => "INVALID_POLICY",
            CoreError::Pattern(_) => "INTERNAL_ERROR",
            CoreError::Json(_) => "INTERNAL_ERROR",
            CoreError::MalformedRecord { .. } => "MALFORMED_RECORD",
        }
    }
}

/// Structural problems found while parsing composite-state blocks.
///
/// These are content outcomes: they are attached to the offending line in the
/// report and parsing carries on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    #[error("Composite state must contain at least one transition")]
    EmptyComposite { name: Option<String> },

    #[error("Missing opening brace after state declaration")]
    MissingOpeningBrace { name: String },

    #[error("Missing closing brace for composite state")]
    UnclosedComposite { name: Option<String> },

    #[error("Unexpected closing brace without matching opening brace")]
    UnmatchedClosingBrace,

    #[error("Graph must contain at least one transition")]
    GraphWithoutTransitions,
}

impl StructuralError {
    /// Returns a stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            StructuralError::EmptyComposite { .. } => "EMPTY_COMPOSITE",
            StructuralError::MissingOpeningBrace { .. } => "MISSING_OPENING_BRACE",
            StructuralError::UnclosedComposite { .. } => "UNCLOSED_COMPOSITE",
            StructuralError::UnmatchedClosingBrace => "UNMATCHED_CLOSING_BRACE",
            StructuralError::GraphWithoutTransitions => "NO_TRANSITIONS",
        }
    }

    /// Name of the composite state involved, if any.
    pub fn state_name(&self) -> Option<&str> {
        match self {
            StructuralError::EmptyComposite { name } | StructuralError::UnclosedComposite { name } => {
                name.as_deref()
            }
            StructuralError::MissingOpeningBrace { name } => Some(name),
            _ => None,
        }
    }
}
