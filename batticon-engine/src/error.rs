use std::io;

use thiserror::Error;

use batticon_pixmap::IconError;
use batticon_power::PowerError;

/// Errors originating from the `batticon-engine` runtime.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("power source error: {0}")]
    Power(#[from] PowerError),

    #[error("icon set error: {0}")]
    Icon(#[from] IconError),

    #[error("poll error: {0}")]
    Poll(io::Error),

    #[error("window system error: {0}")]
    Window(io::Error),

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
