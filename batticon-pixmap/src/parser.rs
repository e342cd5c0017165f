//! Line-oriented decoder for the bundled icon resource format.
//!
//! A document is a sequence of blank-line separated blocks. Each block
//! starts with an `icon <threshold>` or `icon charging` header followed by
//! equal-width art rows drawn with the fixed palette:
//!
//! * `.` transparent
//! * `#` black, `o` white
//! * `r` / `y` / `g` red, yellow and green gauge fill

use crate::error::IconError;
use crate::pixmap::{Icon, Mask, Pixmap, Rgb};

/// Source icons decoded from an icon-data document.
///
/// `levels` keeps the document's threshold order; the charging glyph is the
/// overlay source and never a selectable level.
#[derive(Debug)]
pub struct IconData {
    pub levels: Vec<(u8, Icon)>,
    pub charging_glyph: Icon,
}

enum Header {
    Level(u8),
    Charging,
}

fn palette(ch: char) -> Option<Option<Rgb>> {
    match ch {
        '.' => Some(None),
        '#' => Some(Some(Rgb::BLACK)),
        'o' => Some(Some(Rgb::WHITE)),
        'r' => Some(Some(Rgb::new(0xd0, 0x20, 0x20))),
        'y' => Some(Some(Rgb::new(0xe8, 0xc0, 0x20))),
        'g' => Some(Some(Rgb::new(0x20, 0xa0, 0x30))),
        _ => None,
    }
}

/// Decode a full icon-data document.
///
/// Validation is complete here: threshold ordering and range, glyph
/// multiplicity and level dimensions are all checked, so table construction
/// downstream cannot fail.
pub fn parse_icon_data(input: &str) -> Result<IconData, IconError> {
    let mut levels: Vec<(u8, Icon)> = Vec::new();
    let mut charging_glyph = None;

    let mut lines = input.lines().enumerate().peekable();
    while let Some((index, line)) = lines.next() {
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }

        let header = parse_header(index, line)?;

        let mut rows = Vec::new();
        let mut rows_start = index + 1;
        while let Some((row_index, row)) = lines.peek() {
            let row = row.trim_end();
            if row.is_empty() || row.starts_with("icon ") {
                break;
            }
            if rows.is_empty() {
                rows_start = *row_index;
            }
            rows.push(row);
            lines.next();
        }

        let icon = decode_art(rows_start, &rows)?;

        match header {
            Header::Level(threshold) => {
                if threshold > 100 {
                    return Err(IconError::ThresholdRange(threshold));
                }
                if let Some((prev, _)) = levels.last() {
                    if *prev >= threshold {
                        return Err(IconError::ThresholdOrder {
                            prev: *prev,
                            next: threshold,
                        });
                    }
                }
                levels.push((threshold, icon));
            },
            Header::Charging => {
                if charging_glyph.is_some() {
                    return Err(IconError::DuplicateGlyph);
                }
                charging_glyph = Some(icon);
            },
        }
    }

    if levels.is_empty() {
        return Err(IconError::Empty);
    }

    let (first_w, first_h) = {
        let icon = &levels[0].1;
        (icon.width(), icon.height())
    };
    for (_, icon) in &levels {
        if icon.width() != first_w || icon.height() != first_h {
            return Err(IconError::DimensionMismatch(
                first_w,
                first_h,
                icon.width(),
                icon.height(),
            ));
        }
    }

    let charging_glyph = charging_glyph.ok_or(IconError::MissingGlyph)?;

    Ok(IconData {
        levels,
        charging_glyph,
    })
}

fn parse_header(index: usize, line: &str) -> Result<Header, IconError> {
    let parse_error = |reason: &str| IconError::Parse {
        line: index + 1,
        reason: reason.to_string(),
    };

    let token = line
        .strip_prefix("icon ")
        .ok_or_else(|| parse_error("expected `icon <threshold>` or `icon charging`"))?
        .trim();

    if token == "charging" {
        return Ok(Header::Charging);
    }

    token
        .parse::<u8>()
        .map(Header::Level)
        .map_err(|_| parse_error("threshold is not an integer in 0..=100"))
}

fn decode_art(rows_start: usize, rows: &[&str]) -> Result<Icon, IconError> {
    if rows.is_empty() {
        return Err(IconError::Parse {
            line: rows_start,
            reason: "icon block has no art rows".to_string(),
        });
    }

    let width = rows[0].chars().count();
    let height = rows.len();
    let mut pixmap = Pixmap::new(width, height, Rgb::WHITE);
    let mut mask = Mask::new(width, height);

    for (y, row) in rows.iter().enumerate() {
        if row.chars().count() != width {
            return Err(IconError::Parse {
                line: rows_start + y + 1,
                reason: format!("art row is {} wide, expected {width}", row.chars().count()),
            });
        }

        for (x, ch) in row.chars().enumerate() {
            match palette(ch) {
                Some(Some(color)) => {
                    pixmap.put(x, y, color);
                    mask.set(x, y, true);
                },
                Some(None) => {},
                None => {
                    return Err(IconError::Parse {
                        line: rows_start + y + 1,
                        reason: format!("unknown palette character {ch:?}"),
                    });
                },
            }
        }
    }

    Ok(Icon::new(pixmap, mask))
}
