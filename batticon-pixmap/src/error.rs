use thiserror::Error;

/// Errors raised while decoding icon data or assembling the icon table.
#[derive(Debug, Error)]
pub enum IconError {
    #[error("icon data line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("icon thresholds must strictly increase: {prev} followed by {next}")]
    ThresholdOrder { prev: u8, next: u8 },

    #[error("icon threshold {0} is above 100")]
    ThresholdRange(u8),

    #[error("icon data declares no charging glyph")]
    MissingGlyph,

    #[error("icon data declares more than one charging glyph")]
    DuplicateGlyph,

    #[error("icon data declares no battery levels")]
    Empty,

    #[error("battery levels disagree on dimensions: {0}x{1} and {2}x{3}")]
    DimensionMismatch(usize, usize, usize, usize),
}
