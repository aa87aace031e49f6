use crate::models::LayerId;

/// Errors surfaced by the editing core.
///
/// Most store operations never produce these: referencing a missing layer
/// degrades to a no-op. They are returned where a caller has to react, e.g.
/// when form input cannot be turned into a valid patch.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditorError {
    #[error("Layer not found: {0}")]
    NotFound(LayerId),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),
}

impl EditorError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        EditorError::InvalidArgument(message.into())
    }
}
