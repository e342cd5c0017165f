use std::time::Duration;

/// Configuration knobs for the icon-state engine.
#[derive(Clone, Debug)]
pub struct EngineOptions {
    /// Wall-clock interval between battery samples.
    pub poll_interval: Duration,
    /// Build and display the 2x density icon set.
    pub hidpi: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(10),
            hidpi: false,
        }
    }
}
