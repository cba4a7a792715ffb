//! Unified error handling for the tile explorer.
//!
//! The grid analytics themselves never fail. Errors only arise in the
//! orchestration layer: resolving an activity's tiles, talking to the tile
//! store, or reading configuration.

use thiserror::Error;

/// Unified error type for tile explorer operations.
#[derive(Debug, Clone, Error)]
pub enum ExplorerError {
    /// The track backing an activity could not be found
    #[error("Activity {activity_id}: source not found: {message}")]
    SourceNotFound { activity_id: i64, message: String },
    /// The track backing an activity could not be turned into tiles
    #[error("Activity {activity_id}: malformed input: {message}")]
    MalformedInput { activity_id: i64, message: String },
    /// Reading from or writing to the tile store failed
    #[error("Persistence failure: {message}")]
    PersistenceFailure { message: String },
    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError { message: String },
    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ExplorerError {
    /// Whether the error must abort the current run.
    ///
    /// Source errors only skip the affected activity.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            ExplorerError::SourceNotFound { .. } | ExplorerError::MalformedInput { .. }
        )
    }

    /// The activity an error belongs to, if it is a per-activity error.
    pub fn activity_id(&self) -> Option<i64> {
        match self {
            ExplorerError::SourceNotFound { activity_id, .. }
            | ExplorerError::MalformedInput { activity_id, .. } => Some(*activity_id),
            _ => None,
        }
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        ExplorerError::PersistenceFailure {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        ExplorerError::ConfigError {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ExplorerError::Internal {
            message: message.into(),
        }
    }
}

/// Result type alias for tile explorer operations.
pub type Result<T> = std::result::Result<T, ExplorerError>;

/// Extension trait for converting Option to ExplorerError.
pub trait OptionExt<T> {
    /// Convert Option to Result with a source-not-found error.
    fn ok_or_source_not_found(self, activity_id: i64, message: &str) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_source_not_found(self, activity_id: i64, message: &str) -> Result<T> {
        self.ok_or_else(|| ExplorerError::SourceNotFound {
            activity_id,
            message: message.to_string(),
        })
    }
}
