//! Platform battery-read capability.
//!
//! [`PowerSource`] is the seam between the icon-state engine and the
//! operating system: one reading per call, no retries, and a declared
//! [`FailurePolicy`] that tells the engine whether a failed read is fatal
//! or degrades to an empty gauge.
//!
//! [`SysfsBattery`] implements the trait over Linux's
//! `/sys/class/power_supply` tree; [`FakePower`] replays a script and backs
//! the engine tests.

mod errors;
mod fake;
mod source;
mod sysfs;

pub use errors::PowerError;
pub use fake::FakePower;
pub use source::{FailurePolicy, PowerReading, PowerSource};
pub use sysfs::SysfsBattery;
