//! Host-level error taxonomy

use thiserror::Error;

use crate::engine::{EngineError, SettingsError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("invalid settings: {0}")]
    InvalidSettings(#[from] SettingsError),

    #[error("clock is not running; side switch ignored")]
    NotRunning,

    #[error("failed to lock {0}")]
    LockPoisoned(&'static str),
}
