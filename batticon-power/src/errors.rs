use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PowerError {
    #[error("no battery found under {}", .0.display())]
    NoBattery(PathBuf),

    #[error("battery i/o error: {0}")]
    IO(#[from] io::Error),
}
