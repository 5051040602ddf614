use thiserror::Error;

/// Failure reported by a [`crate::store::TaskStore`].
///
/// A refused connection, a timeout, a 404 and a 500 all surface as the same
/// `Transport` variant.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid task: {0}")]
    Validation(String),

    #[error("{operation} failed: {detail}")]
    Transport {
        operation: &'static str,
        detail: String,
    },
}

impl StoreError {
    pub fn empty_title() -> Self {
        Self::Validation("title must not be empty".to_string())
    }

    pub fn transport(operation: &'static str, detail: impl ToString) -> Self {
        Self::Transport {
            operation,
            detail: detail.to_string(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
