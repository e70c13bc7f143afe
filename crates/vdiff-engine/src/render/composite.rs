use image::{Rgba, RgbaImage, imageops};

/// Gap between panels, in pixels.
const GAP: u32 = 10;
/// Glyph cell is 5x7; drawn at this scale.
const SCALE: u32 = 2;
const GLYPH_W: u32 = 5;
const GLYPH_H: u32 = 7;
const LABEL_PAD: u32 = 4;
const LABEL_HEIGHT: u32 = GLYPH_H * SCALE + LABEL_PAD * 2;

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
const INK: Rgba<u8> = Rgba([31, 41, 51, 255]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Expected,
    Actual,
    Difference,
}

impl Panel {
    pub fn label(self) -> &'static str {
        match self {
            Self::Expected => "EXPECTED",
            Self::Actual => "ACTUAL",
            Self::Difference => "DIFFERENCE",
        }
    }
}

/// Horizontal distance between the origins of consecutive glyphs.
const ADVANCE: u32 = (GLYPH_W + 1) * SCALE;

/// Width of a rendered label including its left and right padding.
fn label_width(text: &str) -> u32 {
    let chars = text.chars().count() as u32;
    LABEL_PAD * 2 + (chars * ADVANCE).saturating_sub(SCALE)
}

/// Place the given images side by side on a white canvas, each under a text
/// label. Panels are top-aligned; the canvas is as tall as the tallest one.
/// A column is at least as wide as its label, so narrow images never share
/// label space with their neighbours.
pub fn side_by_side(panels: &[(Panel, &RgbaImage)]) -> RgbaImage {
    let columns: Vec<u32> = panels
        .iter()
        .map(|(panel, img)| img.width().max(label_width(panel.label())))
        .collect();
    let width = columns.iter().sum::<u32>() + GAP * columns.len().saturating_sub(1) as u32;
    let height = panels.iter().map(|(_, img)| img.height()).max().unwrap_or(0) + LABEL_HEIGHT;

    let mut canvas = RgbaImage::from_pixel(width, height, BACKGROUND);
    let mut x = 0;
    for ((panel, img), column) in panels.iter().zip(&columns) {
        draw_text(&mut canvas, x + LABEL_PAD, LABEL_PAD, panel.label());
        imageops::overlay(&mut canvas, *img, i64::from(x), i64::from(LABEL_HEIGHT));
        x += column + GAP;
    }
    canvas
}

/// Draw `text` with the built-in 5x7 font. Characters outside the font
/// advance the cursor without drawing; anything past the canvas is clipped.
fn draw_text(canvas: &mut RgbaImage, x: u32, y: u32, text: &str) {
    for (i, ch) in text.chars().enumerate() {
        let Some(rows) = glyph(ch) else {
            continue;
        };
        let origin = x + i as u32 * ADVANCE;
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_W {
                if bits & (1 << (GLYPH_W - 1 - col)) == 0 {
                    continue;
                }
                for dy in 0..SCALE {
                    for dx in 0..SCALE {
                        let px = origin + col * SCALE + dx;
                        let py = y + row as u32 * SCALE + dy;
                        if px < canvas.width() && py < canvas.height() {
                            canvas.put_pixel(px, py, INK);
                        }
                    }
                }
            }
        }
    }
}

fn glyph(ch: char) -> Option<[u8; 7]> {
    let rows = match ch {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'N' => [0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001, 0b10001],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        _ => return None,
    };
    Some(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_label_is_drawable() {
        for panel in [Panel::Expected, Panel::Actual, Panel::Difference] {
            assert!(panel.label().chars().all(|c| glyph(c).is_some()));
        }
    }

    #[test]
    fn three_panels_layout() {
        let a = RgbaImage::from_pixel(100, 40, Rgba([255, 0, 0, 255]));
        let b = RgbaImage::from_pixel(100, 40, Rgba([0, 255, 0, 255]));
        let d = RgbaImage::from_pixel(100, 40, Rgba([0, 0, 255, 255]));
        let out = side_by_side(&[
            (Panel::Expected, &a),
            (Panel::Actual, &b),
            (Panel::Difference, &d),
        ]);
        // EXPECTED (102) and DIFFERENCE (126) labels widen their columns.
        assert_eq!(out.dimensions(), (102 + 100 + 126 + 2 * GAP, 40 + LABEL_HEIGHT));
        assert_eq!(*out.get_pixel(0, LABEL_HEIGHT), Rgba([255, 0, 0, 255]));
        assert_eq!(*out.get_pixel(112, LABEL_HEIGHT), Rgba([0, 255, 0, 255]));
        assert_eq!(*out.get_pixel(222, LABEL_HEIGHT + 39), Rgba([0, 0, 255, 255]));
        // Column slack and gap stay background.
        assert_eq!(*out.get_pixel(101, LABEL_HEIGHT), BACKGROUND);
        assert_eq!(*out.get_pixel(105, LABEL_HEIGHT), BACKGROUND);
    }

    #[test]
    fn small_panels_keep_labels_apart() {
        let a = RgbaImage::from_pixel(10, 10, BACKGROUND);
        let b = RgbaImage::from_pixel(10, 10, BACKGROUND);
        let out = side_by_side(&[(Panel::Expected, &a), (Panel::Actual, &b)]);

        let expected_column = label_width(Panel::Expected.label());
        let actual_start = expected_column + GAP;
        assert_eq!(out.width(), actual_start + label_width(Panel::Actual.label()));

        // Nothing inked between the end of EXPECTED and the start of ACTUAL.
        let between = expected_column - LABEL_PAD..actual_start + LABEL_PAD;
        let stray = (0..LABEL_HEIGHT)
            .flat_map(|y| between.clone().map(move |x| (x, y)))
            .filter(|&(x, y)| *out.get_pixel(x, y) == INK)
            .count();
        assert_eq!(stray, 0);

        // ACTUAL is drawn in full inside its own column.
        let actual_ink = (0..LABEL_HEIGHT)
            .flat_map(|y| (actual_start..out.width()).map(move |x| (x, y)))
            .filter(|&(x, y)| *out.get_pixel(x, y) == INK)
            .count();
        assert!(actual_ink > 0);
    }

    #[test]
    fn labels_leave_ink() {
        let a = RgbaImage::from_pixel(100, 10, BACKGROUND);
        let out = side_by_side(&[(Panel::Expected, &a)]);
        let inked = (0..LABEL_HEIGHT)
            .flat_map(|y| (0..out.width()).map(move |x| (x, y)))
            .filter(|&(x, y)| *out.get_pixel(x, y) == INK)
            .count();
        assert!(inked > 0);
    }

    #[test]
    fn tiny_panel_widens_to_label() {
        let a = RgbaImage::from_pixel(1, 1, BACKGROUND);
        let out = side_by_side(&[(Panel::Difference, &a)]);
        assert_eq!(out.dimensions(), (label_width("DIFFERENCE"), 1 + LABEL_HEIGHT));
        assert_eq!(out.width(), 126);
    }
}
