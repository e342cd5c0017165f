//! Derived-icon construction: charging overlays and hidpi doubling.

use crate::pixmap::{Icon, Mask, Pixmap};

/// Offset of the charging glyph inside a composited icon.
///
/// A small inset near the top-left corner keeps most of the underlying
/// gauge visible.
pub const CHARGING_GLYPH_OFFSET: (usize, usize) = (1, 0);

/// Compose the charging face for `base`.
///
/// The destination is sized to the base icon. The glyph mask is OR'd into
/// the base mask at `offset`, and the glyph bitmap overwrites the base
/// bitmap only where the glyph's own mask is set, clipped to the
/// destination bounds.
pub fn with_charging_overlay(
    base: &Icon,
    glyph: &Icon,
    offset: (usize, usize),
) -> Icon {
    let mut pixmap = base.pixmap().clone();
    let mut mask = base.mask().clone();

    for gy in 0..glyph.height() {
        for gx in 0..glyph.width() {
            if !glyph.mask().get(gx, gy) {
                continue;
            }

            let x = offset.0 + gx;
            let y = offset.1 + gy;
            if x >= base.width() || y >= base.height() {
                continue;
            }

            mask.set(x, y, true);
            pixmap.put(x, y, glyph.pixmap().get(gx, gy));
        }
    }

    Icon::new(pixmap, mask)
}

/// Double an icon with exact nearest-neighbor pixel replication.
///
/// Every source pixel `(x, y)` lands on the four destination pixels
/// `(2x, 2y)`, `(2x+1, 2y)`, `(2x, 2y+1)` and `(2x+1, 2y+1)`, in the color
/// plane and the mask plane alike, so the hard edges of small iconography
/// survive.
pub fn scale2x(icon: &Icon) -> Icon {
    let width = icon.width();
    let height = icon.height();
    let mut pixmap = Pixmap::new(width * 2, height * 2, crate::pixmap::Rgb::WHITE);
    let mut mask = Mask::new(width * 2, height * 2);

    for y in 0..height {
        for x in 0..width {
            let color = icon.pixmap().get(x, y);
            let opaque = icon.mask().get(x, y);

            for (dx, dy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
                pixmap.put(2 * x + dx, 2 * y + dy, color);
                mask.set(2 * x + dx, 2 * y + dy, opaque);
            }
        }
    }

    Icon::new(pixmap, mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixmap::Rgb;

    fn checker(width: usize, height: usize) -> Icon {
        let mut pixmap = Pixmap::new(width, height, Rgb::WHITE);
        let mut mask = Mask::new(width, height);
        for y in 0..height {
            for x in 0..width {
                if (x + y) % 2 == 0 {
                    pixmap.put(x, y, Rgb::BLACK);
                    mask.set(x, y, true);
                }
            }
        }
        Icon::new(pixmap, mask)
    }

    fn solid(width: usize, height: usize, color: Rgb) -> Icon {
        let pixmap = Pixmap::new(width, height, color);
        let mut mask = Mask::new(width, height);
        for y in 0..height {
            for x in 0..width {
                mask.set(x, y, true);
            }
        }
        Icon::new(pixmap, mask)
    }

    #[test]
    fn overlay_mask_is_base_or_glyph() {
        let base = checker(6, 4);
        let glyph = solid(2, 2, Rgb::new(0xe8, 0xc0, 0x20));
        let offset = (1, 1);

        let composed = with_charging_overlay(&base, &glyph, offset);

        for y in 0..4 {
            for x in 0..6 {
                let in_glyph = (offset.0..offset.0 + 2).contains(&x)
                    && (offset.1..offset.1 + 2).contains(&y);
                let expected = base.mask().get(x, y) || in_glyph;
                assert_eq!(composed.mask().get(x, y), expected, "mask at ({x},{y})");
            }
        }
    }

    #[test]
    fn overlay_bitmap_keeps_base_outside_glyph() {
        let base = checker(6, 4);
        let glyph_color = Rgb::new(0xe8, 0xc0, 0x20);
        let glyph = solid(2, 2, glyph_color);
        let offset = (1, 1);

        let composed = with_charging_overlay(&base, &glyph, offset);

        for y in 0..4 {
            for x in 0..6 {
                let in_glyph = (offset.0..offset.0 + 2).contains(&x)
                    && (offset.1..offset.1 + 2).contains(&y);
                let expected = if in_glyph {
                    glyph_color
                } else {
                    base.pixmap().get(x, y)
                };
                assert_eq!(composed.pixmap().get(x, y), expected, "pixel at ({x},{y})");
            }
        }
    }

    #[test]
    fn overlay_skips_transparent_glyph_pixels() {
        let base = solid(4, 4, Rgb::WHITE);
        // Glyph with a single opaque pixel at (1, 0).
        let mut glyph_pixmap = Pixmap::new(2, 1, Rgb::BLACK);
        glyph_pixmap.put(1, 0, Rgb::BLACK);
        let mut glyph_mask = Mask::new(2, 1);
        glyph_mask.set(1, 0, true);
        let glyph = Icon::new(glyph_pixmap, glyph_mask);

        let composed = with_charging_overlay(&base, &glyph, (0, 0));

        assert_eq!(composed.pixmap().get(0, 0), Rgb::WHITE);
        assert_eq!(composed.pixmap().get(1, 0), Rgb::BLACK);
    }

    #[test]
    fn overlay_clips_at_destination_bounds() {
        let base = solid(3, 3, Rgb::WHITE);
        let glyph = solid(3, 3, Rgb::BLACK);

        let composed = with_charging_overlay(&base, &glyph, (2, 2));

        assert_eq!(composed.width(), 3);
        assert_eq!(composed.height(), 3);
        assert_eq!(composed.pixmap().get(2, 2), Rgb::BLACK);
        assert_eq!(composed.pixmap().get(1, 1), Rgb::WHITE);
    }

    #[test]
    fn scale2x_doubles_dimensions() {
        let icon = checker(5, 3);
        let doubled = scale2x(&icon);

        assert_eq!(doubled.width(), 10);
        assert_eq!(doubled.height(), 6);
    }

    #[test]
    fn scale2x_replicates_each_pixel_four_times() {
        let icon = checker(5, 3);
        let doubled = scale2x(&icon);

        for y in 0..3 {
            for x in 0..5 {
                let color = icon.pixmap().get(x, y);
                let opaque = icon.mask().get(x, y);
                for (dx, dy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
                    assert_eq!(doubled.pixmap().get(2 * x + dx, 2 * y + dy), color);
                    assert_eq!(doubled.mask().get(2 * x + dx, 2 * y + dy), opaque);
                }
            }
        }
    }
}
