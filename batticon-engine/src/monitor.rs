//! Power-state sampling, normalization and change detection.

use std::time::{Duration, Instant};

use log::{debug, warn};

use batticon_power::{FailurePolicy, PowerReading, PowerSource};

use crate::error::Result;

/// On external power, readings at or above this floor are reported as
/// full. Near-full batteries oscillate a few points below 100 from sensor
/// noise, and the icon would flicker without the correction.
const FULL_CORRECTION_FLOOR: u8 = 96;

/// The one battery state the process tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerState {
    /// Remaining capacity, clamped into 0..=100 after every sample.
    pub remaining: u8,
    /// Whether external power is connected.
    pub on_ac: bool,
}

/// Result of one sampling pass.
#[derive(Debug, Clone, Copy)]
pub struct Sample {
    pub state: PowerState,
    /// Whether `(remaining, on_ac)` differs from the previous sample.
    pub changed: bool,
}

/// Samples a [`PowerSource`] and owns the derived [`PowerState`].
///
/// The state is updated in place; nothing outside this type mutates it.
pub struct PowerMonitor<P> {
    source: P,
    policy: FailurePolicy,
    state: PowerState,
    previous: Option<(u8, bool)>,
    last_sample: Option<Instant>,
}

impl<P: PowerSource> PowerMonitor<P> {
    pub fn new(source: P) -> Self {
        let policy = source.failure_policy();
        Self {
            source,
            policy,
            state: PowerState {
                remaining: 0,
                on_ac: false,
            },
            previous: None,
            last_sample: None,
        }
    }

    pub fn state(&self) -> PowerState {
        self.state
    }

    /// Borrow the underlying power source.
    pub fn source(&self) -> &P {
        &self.source
    }

    /// Take one reading and fold it into the power state.
    ///
    /// The sample clock is recorded before the read, unconditionally, so
    /// the polling timer stays accurate even when the read fails.
    pub fn sample(&mut self) -> Result<Sample> {
        self.last_sample = Some(Instant::now());

        let reading = match self.source.read() {
            Ok(reading) => reading,
            Err(err) => match self.policy {
                FailurePolicy::Fatal => return Err(err.into()),
                FailurePolicy::Degrade => {
                    warn!("battery read failed, reporting empty: {err}");
                    PowerReading {
                        percent: Some(0),
                        on_ac: self.state.on_ac,
                    }
                },
            },
        };

        // An unknown reading counts as empty; anything above 100 is noise.
        let mut remaining = reading.percent.unwrap_or(0).min(100);
        if reading.on_ac && remaining >= FULL_CORRECTION_FLOOR {
            remaining = 100;
        }

        let pair = (remaining, reading.on_ac);
        let changed = self.previous != Some(pair);
        self.previous = Some(pair);
        self.state = PowerState {
            remaining,
            on_ac: reading.on_ac,
        };

        if changed {
            debug!("ac: {}, battery: {}%", self.state.on_ac, self.state.remaining);
        }

        Ok(Sample {
            state: self.state,
            changed,
        })
    }

    /// Time since the last sampling attempt, if any.
    pub fn elapsed(&self) -> Option<Duration> {
        self.last_sample.map(|at| at.elapsed())
    }

    /// How long the loop may block before the next sample is due.
    pub fn next_wait(&self, interval: Duration) -> Duration {
        match self.elapsed() {
            Some(elapsed) => interval.saturating_sub(elapsed),
            None => Duration::ZERO,
        }
    }

    /// Whether the polling interval has expired since the last sample.
    pub fn poll_due(&self, interval: Duration) -> bool {
        match self.elapsed() {
            Some(elapsed) => elapsed >= interval,
            None => true,
        }
    }
}
