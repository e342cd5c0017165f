//! Battery icon raster model.
//!
//! This crate owns everything pixel-shaped in the workspace:
//! - [`Pixmap`], [`Mask`] and [`Icon`] — the owned raster primitives,
//! - the icon-data parser for the bundled resource format,
//! - the compositor deriving charging overlays and 2x hidpi faces,
//! - [`IconTable`], the ordered breakpoint table the engine selects from.
//!
//! The table is built once at startup from `include_str!`-embedded data and
//! treated as read-only for the rest of the process.

mod compose;
mod error;
mod parser;
mod pixmap;
mod table;

pub use compose::{CHARGING_GLYPH_OFFSET, scale2x, with_charging_overlay};
pub use error::IconError;
pub use parser::{IconData, parse_icon_data};
pub use pixmap::{Icon, Mask, Pixmap, Rgb};
pub use table::{IconTable, IconVariant};
