//! Linux battery backend over `/sys/class/power_supply`.

use std::fs::{self, File};
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use log::info;

use crate::errors::PowerError;
use crate::source::{FailurePolicy, PowerReading, PowerSource};

const POWER_SUPPLY_ROOT: &str = "/sys/class/power_supply";

/// Battery reader over the kernel's power-supply class.
///
/// The battery's `capacity` attribute stays open for the process lifetime
/// and is re-read from offset 0 on every sample. AC state comes from the
/// first mains/USB supply's `online` attribute, falling back to the battery
/// `status` attribute when no charger device is exposed.
pub struct SysfsBattery {
    capacity: File,
    battery_dir: PathBuf,
    ac_online: Option<PathBuf>,
}

impl SysfsBattery {
    /// Open the first battery found under `/sys/class/power_supply`.
    pub fn open() -> Result<Self, PowerError> {
        Self::open_at(Path::new(POWER_SUPPLY_ROOT))
    }

    /// Open the first battery under an alternate supply tree.
    pub fn open_at(root: &Path) -> Result<Self, PowerError> {
        let mut battery_dir: Option<PathBuf> = None;
        let mut ac_online: Option<PathBuf> = None;

        for entry in fs::read_dir(root)? {
            let entry = entry?;
            let dir = entry.path();

            let Ok(supply_type) = fs::read_to_string(dir.join("type")) else {
                continue;
            };

            match supply_type.trim() {
                "Battery" if battery_dir.is_none() => battery_dir = Some(dir),
                "Mains" | "USB" if ac_online.is_none() => {
                    let online = dir.join("online");
                    if online.exists() {
                        ac_online = Some(online);
                    }
                },
                _ => {},
            }
        }

        let battery_dir =
            battery_dir.ok_or_else(|| PowerError::NoBattery(root.to_path_buf()))?;
        let capacity = File::open(battery_dir.join("capacity"))?;

        info!("found battery at {}", battery_dir.display());

        Ok(Self {
            capacity,
            battery_dir,
            ac_online,
        })
    }

    fn read_ac(&self) -> bool {
        if let Some(online) = &self.ac_online {
            if let Ok(raw) = fs::read_to_string(online) {
                return raw.trim() == "1";
            }
        }

        // No charger device; infer from the battery's own status.
        if let Ok(status) = fs::read_to_string(self.battery_dir.join("status")) {
            return matches!(status.trim(), "Charging" | "Full");
        }

        false
    }
}

impl PowerSource for SysfsBattery {
    fn read(&mut self) -> Result<PowerReading, PowerError> {
        self.capacity.seek(SeekFrom::Start(0))?;
        let mut raw = String::new();
        self.capacity.read_to_string(&mut raw)?;

        // An unparsable capacity is an "unknown" reading, not an error.
        let percent = raw.trim().parse::<u32>().ok().map(|v| v.min(100) as u8);

        Ok(PowerReading {
            percent,
            on_ac: self.read_ac(),
        })
    }

    fn failure_policy(&self) -> FailurePolicy {
        FailurePolicy::Degrade
    }
}
