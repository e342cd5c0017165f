//! Scripted power source for tests and development away from real
//! hardware.

use std::collections::VecDeque;
use std::io;

use crate::errors::PowerError;
use crate::source::{FailurePolicy, PowerReading, PowerSource};

enum Step {
    Reading(PowerReading),
    Fail,
}

/// Power source that replays a script of readings.
///
/// Once the script is exhausted the last successful reading repeats, so a
/// fake with a single entry behaves like a steady battery.
pub struct FakePower {
    script: VecDeque<Step>,
    last: PowerReading,
    policy: FailurePolicy,
    reads: usize,
}

impl FakePower {
    pub fn new(percent: u8, on_ac: bool) -> Self {
        Self {
            script: VecDeque::new(),
            last: PowerReading {
                percent: Some(percent),
                on_ac,
            },
            policy: FailurePolicy::Degrade,
            reads: 0,
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Queue a reading to be returned by a future `read` call.
    pub fn push_reading(&mut self, percent: Option<u8>, on_ac: bool) {
        self.script
            .push_back(Step::Reading(PowerReading { percent, on_ac }));
    }

    /// Queue one failed read.
    pub fn push_error(&mut self) {
        self.script.push_back(Step::Fail);
    }

    /// Number of `read` calls served so far.
    pub fn reads(&self) -> usize {
        self.reads
    }
}

impl PowerSource for FakePower {
    fn read(&mut self) -> Result<PowerReading, PowerError> {
        self.reads += 1;

        match self.script.pop_front() {
            Some(Step::Reading(reading)) => {
                self.last = reading;
                Ok(reading)
            },
            Some(Step::Fail) => {
                Err(PowerError::IO(io::Error::other("scripted read failure")))
            },
            None => Ok(self.last),
        }
    }

    fn failure_policy(&self) -> FailurePolicy {
        self.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeats_last_reading_when_script_runs_dry() {
        let mut fake = FakePower::new(42, false);
        fake.push_reading(Some(41), false);

        assert_eq!(fake.read().unwrap().percent, Some(41));
        assert_eq!(fake.read().unwrap().percent, Some(41));
        assert_eq!(fake.reads(), 2);
    }

    #[test]
    fn scripted_failures_surface_as_errors() {
        let mut fake = FakePower::new(42, false).with_policy(FailurePolicy::Fatal);
        fake.push_error();

        assert!(fake.read().is_err());
        assert_eq!(fake.failure_policy(), FailurePolicy::Fatal);
    }
}
