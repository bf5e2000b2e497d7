//! Engine errors.

use cuidar_core::{PracticeId, UserId};
use cuidar_storage::StorageError;

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, ProgressError>;

/// Errors surfaced by the progress engine.
///
/// Absence of data (no completions, no matching practice) is never an
/// error; it comes back as zero or `None`.
#[derive(Debug, thiserror::Error)]
pub enum ProgressError {
    /// The data layer failed or returned something unusable.
    #[error("data source unavailable: {0}")]
    SourceUnavailable(#[from] StorageError),

    /// A completion referenced a practice that does not exist.
    #[error("unknown practice: {0}")]
    UnknownPractice(PracticeId),

    /// An operation needed the user's profile and there is none.
    #[error("no profile for user {0}")]
    ProfileNotFound(UserId),

    /// Onboarding answers failed validation.
    #[error("invalid onboarding answers: {0}")]
    InvalidOnboarding(String),

    /// A mood check-in was missing its mood.
    #[error("invalid check-in: {0}")]
    InvalidCheckin(String),
}
