//! Error types for the game core.
//!
//! Most faults never reach the caller: storage reads fall back to defaults and
//! unknown keys are dropped. What remains is a scene that cannot start, a
//! storage write that failed, or a tuning file that does not make sense.

use thiserror::Error;

use crate::persistence::StorageError;
use crate::scene::SceneError;

#[derive(Debug, Error)]
pub enum GameError {
    /// Renderer could not be attached; the session stays idle.
    #[error("scene unavailable: {0}")]
    Scene(#[from] SceneError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("tuning parse error: {0}")]
    TuningParse(#[from] serde_json::Error),

    /// A tuning value is outside the range the simulation supports.
    #[error("invalid tuning value '{field}': {reason}")]
    InvalidTuning {
        field: &'static str,
        reason: &'static str,
    },
}

/// Convenience alias: a `Result` using `GameError` as the error type.
pub type GameResult<T> = Result<T, GameError>;
