//! The ordered battery icon table and percentage-based selection.

use crate::compose::{CHARGING_GLYPH_OFFSET, scale2x, with_charging_overlay};
use crate::error::IconError;
use crate::parser::{IconData, parse_icon_data};
use crate::pixmap::Icon;

/// Icon resources compiled into the crate.
const BUNDLED_ICON_DATA: &str = include_str!("icons/battery.icons");

/// One selectable battery level with its derived faces.
#[derive(Debug)]
pub struct IconVariant {
    threshold: u8,
    base: Icon,
    charging: Icon,
    hidpi: Option<Icon>,
    hidpi_charging: Option<Icon>,
}

impl IconVariant {
    /// Battery percentage at which this entry becomes the displayed icon.
    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    pub fn base(&self) -> &Icon {
        &self.base
    }

    pub fn charging(&self) -> &Icon {
        &self.charging
    }

    /// The face to display for the given power state and density.
    ///
    /// Falls back to the base-density face when no hidpi set was built.
    pub fn face(&self, charging: bool, hidpi: bool) -> &Icon {
        match (charging, hidpi) {
            (false, false) => &self.base,
            (true, false) => &self.charging,
            (false, true) => self.hidpi.as_ref().unwrap_or(&self.base),
            (true, true) => self.hidpi_charging.as_ref().unwrap_or(&self.charging),
        }
    }
}

/// Ordered, immutable table of battery icons plus the charging glyph
/// source.
///
/// Built once before the event loop starts and read-only afterwards.
/// Thresholds strictly increase, so [`IconTable::select`] is a total,
/// monotonic function over 0..=100. The charging glyph participates in
/// compositing only and is never selectable.
#[derive(Debug)]
pub struct IconTable {
    entries: Vec<IconVariant>,
    glyph: Icon,
}

impl IconTable {
    /// Parse and build the bundled icon set.
    pub fn bundled(hidpi: bool) -> Result<Self, IconError> {
        Ok(Self::from_data(parse_icon_data(BUNDLED_ICON_DATA)?, hidpi))
    }

    /// Build a table from decoded source icons, deriving the charging face
    /// for every level and, when requested, the 2x density set.
    pub fn from_data(data: IconData, hidpi: bool) -> Self {
        let IconData {
            levels,
            charging_glyph,
        } = data;

        let entries = levels
            .into_iter()
            .map(|(threshold, base)| {
                let charging = with_charging_overlay(
                    &base,
                    &charging_glyph,
                    CHARGING_GLYPH_OFFSET,
                );
                let (hidpi_base, hidpi_charging) = if hidpi {
                    (Some(scale2x(&base)), Some(scale2x(&charging)))
                } else {
                    (None, None)
                };

                IconVariant {
                    threshold,
                    base,
                    charging,
                    hidpi: hidpi_base,
                    hidpi_charging,
                }
            })
            .collect();

        log::debug!("icon table built, hidpi: {hidpi}");

        Self {
            entries,
            glyph: charging_glyph,
        }
    }

    /// Index of the entry with the greatest threshold not exceeding
    /// `remaining`; index 0 when `remaining` sits below the lowest
    /// breakpoint.
    pub fn select(&self, remaining: u8) -> usize {
        let remaining = remaining.min(100);
        self.entries
            .partition_point(|entry| entry.threshold <= remaining)
            .saturating_sub(1)
    }

    pub fn get(&self, index: usize) -> &IconVariant {
        &self.entries[index]
    }

    pub fn entries(&self) -> &[IconVariant] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The charging glyph source icon.
    pub fn charging_glyph(&self) -> &Icon {
        &self.glyph
    }
}
