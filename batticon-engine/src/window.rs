//! The windowing-system collaborator boundary.

use std::io;

use mio::{Registry, Token};

use batticon_pixmap::{Mask, Pixmap};

/// Events a window backend surfaces to the event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    /// The window (re)became visible or was resized; repaint the last
    /// selected icon without re-sampling.
    Redraw,
    /// The user asked the indicator to quit.
    CloseRequested,
}

/// Renderer and event-source seam to the host windowing environment.
///
/// A backend registers every descriptor it owns under the single token the
/// loop hands it; readiness on any of them leads to one
/// [`drain_events`](Self::drain_events) call.
pub trait StatusWindow {
    fn register(&mut self, registry: &Registry, token: Token) -> io::Result<()>;

    fn deregister(&mut self, registry: &Registry) -> io::Result<()>;

    /// Drain pending backend events without blocking.
    fn drain_events(&mut self) -> io::Result<Vec<WindowEvent>>;

    /// Stage the icon to display.
    fn set_icon(&mut self, pixmap: &Pixmap, mask: &Mask) -> io::Result<()>;

    /// Stage the window / icon-name title.
    fn set_title(&mut self, title: &str) -> io::Result<()>;

    /// Push the staged state to the display.
    fn present(&mut self) -> io::Result<()>;
}
