//! The icon-state engine: selection, title text and rendering.

use std::time::Duration;

use log::debug;

use batticon_pixmap::IconTable;
use batticon_power::PowerSource;

use crate::error::{EngineError, Result};
use crate::monitor::{PowerMonitor, PowerState};
use crate::options::EngineOptions;
use crate::window::StatusWindow;

/// Window / icon-name text for a power state.
pub fn status_title(state: PowerState) -> String {
    if state.on_ac {
        if state.remaining >= 99 {
            "Charged".to_string()
        } else {
            format!("Charging: {}%", state.remaining)
        }
    } else {
        format!("Battery: {}%", state.remaining)
    }
}

/// Ties the power monitor to the icon table and pushes the selected face
/// through a [`StatusWindow`].
pub struct StatusEngine<P> {
    monitor: PowerMonitor<P>,
    icons: IconTable,
    options: EngineOptions,
    current: usize,
}

impl<P: PowerSource> StatusEngine<P> {
    pub fn new(source: P, icons: IconTable, options: EngineOptions) -> Self {
        Self {
            monitor: PowerMonitor::new(source),
            icons,
            options,
            current: 0,
        }
    }

    pub fn monitor(&self) -> &PowerMonitor<P> {
        &self.monitor
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Index of the last selected table entry.
    pub fn current(&self) -> usize {
        self.current
    }

    /// Sample the battery; on change, re-select and render.
    pub fn refresh<W: StatusWindow>(&mut self, window: &mut W) -> Result<()> {
        let sample = self.monitor.sample()?;
        if sample.changed {
            self.render(window)?;
        }
        Ok(())
    }

    /// Render the current state without re-sampling.
    ///
    /// Selection is pure, so repeated renders of an unchanged state push
    /// the identical face.
    pub fn render<W: StatusWindow>(&mut self, window: &mut W) -> Result<()> {
        let state = self.monitor.state();
        self.current = self.icons.select(state.remaining);

        let entry = self.icons.get(self.current);
        let face = entry.face(state.on_ac, self.options.hidpi);

        window
            .set_icon(face.pixmap(), face.mask())
            .map_err(EngineError::Window)?;
        window
            .set_title(&status_title(state))
            .map_err(EngineError::Window)?;
        window.present().map_err(EngineError::Window)?;

        debug!(
            "rendered entry {} (threshold {}%)",
            self.current,
            entry.threshold()
        );

        Ok(())
    }

    /// How long the loop may block before the next sample is due.
    pub fn next_wait(&self) -> Duration {
        self.monitor.next_wait(self.options.poll_interval)
    }

    /// Whether the polling interval has expired.
    pub fn poll_due(&self) -> bool {
        self.monitor.poll_due(self.options.poll_interval)
    }
}
