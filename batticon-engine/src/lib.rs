//! Icon-state engine for the battery status indicator.
//!
//! This crate connects the lower-level building blocks from the batticon
//! workspace:
//! - [`batticon_power`] for reading the platform battery state,
//! - [`batticon_pixmap`] for the icon table and its derived faces.
//!
//! The main entry points are:
//! - [`StatusEngine`], which owns the power monitor and the icon table and
//!   pushes the selected face through a [`StatusWindow`] backend,
//! - [`EventLoop`], a single-threaded `mio` driver multiplexing the window
//!   source, the exit pipe and the polling interval.
//!
//! Front-ends implement [`StatusWindow`], install an [`ExitPipe`] for their
//! termination signals, and hand all three to [`EventLoop::run`].

mod engine;
mod error;
mod event_loop;
mod exit;
mod monitor;
mod options;
mod window;

pub use engine::{StatusEngine, status_title};
pub use error::{EngineError, Result};
pub use event_loop::{EXIT_TOKEN, EventLoop, WINDOW_TOKEN};
pub use exit::ExitPipe;
pub use monitor::{PowerMonitor, PowerState, Sample};
pub use options::EngineOptions;
pub use window::{StatusWindow, WindowEvent};

pub use batticon_pixmap as pixmap;
pub use batticon_power as power;
