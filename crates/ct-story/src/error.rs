//! Error types for the story engine.

use thiserror::Error;

/// Result type for story operations.
pub type StoryResult<T> = Result<T, StoryError>;

/// Errors that can occur while running a story session.
#[derive(Debug, Error)]
pub enum StoryError {
    /// Choice index outside the presented set.
    #[error("invalid choice: {number} (choose 1-{available})", number = .index.saturating_add(1))]
    InvalidChoice {
        /// Zero-based index that was requested.
        index: usize,
        /// Number of choices on offer.
        available: usize,
    },

    /// Save or restore failed: blob missing, unreadable, or corrupt.
    #[error("persistence failure: {0}")]
    Persistence(String),

    /// No scene is waiting for a choice.
    #[error("no active scene")]
    NoActiveScene,

    /// `advance` was called with nothing scheduled.
    #[error("no pending advance")]
    NoPendingAdvance,

    /// A scene identifier did not name any scene.
    #[error("unknown scene: {0}")]
    UnknownScene(String),
}

impl From<serde_json::Error> for StoryError {
    fn from(e: serde_json::Error) -> Self {
        Self::Persistence(e.to_string())
    }
}

impl From<std::io::Error> for StoryError {
    fn from(e: std::io::Error) -> Self {
        Self::Persistence(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_choice_is_one_based() {
        let err = StoryError::InvalidChoice {
            index: 3,
            available: 3,
        };
        assert_eq!(err.to_string(), "invalid choice: 4 (choose 1-3)");
    }

    #[test]
    fn json_errors_become_persistence() {
        let err: StoryError = serde_json::from_str::<u32>("not json").unwrap_err().into();
        assert!(matches!(err, StoryError::Persistence(_)));
    }
}
