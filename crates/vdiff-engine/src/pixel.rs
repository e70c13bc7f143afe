//! Per-pixel comparison in YIQ colour space with anti-aliasing detection.
//!
//! Colour distance follows "Measuring perceived color difference using YIQ
//! NTSC transmission color space in mobile applications" (Kotsarenko and
//! Ramos). The anti-aliasing check follows "Anti-aliased Pixel and Intensity
//! Slope Detector" (Vysniauskas, 2009): a pixel is an anti-aliasing candidate
//! when its 3x3 neighbourhood holds both a darker and a brighter sibling, and
//! one of those extremes sits inside a flat area in both images.

use image::{Rgba, RgbaImage};

use crate::options::NEUTRAL_COLOR;
use crate::{ComparisonOptions, DiffError, Result};

/// Maximum possible delta in YIQ color space.
const MAX_YIQ_POSSIBLE_DELTA: f64 = 35215.0;

/// Image with every differing pixel painted in `diff_color` and every other
/// pixel painted in the neutral colour.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffMask {
    image: RgbaImage,
    diff_color: Rgba<u8>,
}

impl DiffMask {
    fn new(width: u32, height: u32, diff_color: [u8; 3]) -> Self {
        let [r, g, b] = NEUTRAL_COLOR;
        Self {
            image: RgbaImage::from_pixel(width, height, Rgba([r, g, b, 255])),
            diff_color: opaque(diff_color),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Whether the pixel at `(x, y)` was flagged as different.
    pub fn is_diff(&self, x: u32, y: u32) -> bool {
        *self.image.get_pixel(x, y) == self.diff_color
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    fn mark(&mut self, x: u32, y: u32) {
        self.image.put_pixel(x, y, self.diff_color);
    }
}

/// Output of the comparator.
#[derive(Debug, Clone)]
pub struct PixelComparison {
    pub diff_pixels: u64,
    pub mask: DiffMask,
}

/// Compare two images of identical dimensions.
///
/// Dimension mismatch is an error: images are never padded, cropped or
/// resized.
pub fn compare(
    expected: &RgbaImage,
    actual: &RgbaImage,
    options: &ComparisonOptions,
) -> Result<PixelComparison> {
    if expected.dimensions() != actual.dimensions() {
        return Err(DiffError::DimensionMismatch {
            left_w: expected.width(),
            left_h: expected.height(),
            right_w: actual.width(),
            right_h: actual.height(),
        });
    }

    let (w, h) = expected.dimensions();
    let mut mask = DiffMask::new(w, h, options.diff_color);
    let mut diff_pixels: u64 = 0;

    // Nothing to do when the buffers match byte for byte.
    if expected.as_raw() == actual.as_raw() {
        return Ok(PixelComparison { diff_pixels, mask });
    }

    // Maximum acceptable square distance between two colours.
    let max_delta = MAX_YIQ_POSSIBLE_DELTA * options.threshold * options.threshold;
    let transparent_alpha = options.alpha_threshold * 255.0;

    for y in 0..h {
        for x in 0..w {
            let lp = *expected.get_pixel(x, y);
            let rp = *actual.get_pixel(x, y);

            if f64::from(lp[3]) <= transparent_alpha && f64::from(rp[3]) <= transparent_alpha {
                continue;
            }

            let delta = color_delta(lp, rp, false);
            if delta.abs() <= max_delta {
                continue;
            }

            if !options.include_anti_aliasing
                && (antialiased(expected, x, y, actual) || antialiased(actual, x, y, expected))
            {
                continue;
            }

            diff_pixels += 1;
            mask.mark(x, y);
        }
    }

    Ok(PixelComparison { diff_pixels, mask })
}

fn opaque([r, g, b]: [u8; 3]) -> Rgba<u8> {
    Rgba([r, g, b, 255])
}

/// Inclusive 3x3 neighbourhood bounds around `(x, y)`, clamped to the image.
fn neighbourhood(x: u32, y: u32, width: u32, height: u32) -> (u32, u32, u32, u32) {
    (
        x.saturating_sub(1),
        y.saturating_sub(1),
        (x + 1).min(width - 1),
        (y + 1).min(height - 1),
    )
}

fn on_border(x: u32, y: u32, width: u32, height: u32) -> bool {
    x == 0 || y == 0 || x == width - 1 || y == height - 1
}

/// Whether the pixel at `(x, y)` in `img` is likely part of anti-aliasing,
/// judged against the same neighbourhood in `other`.
fn antialiased(img: &RgbaImage, x: u32, y: u32, other: &RgbaImage) -> bool {
    let (width, height) = img.dimensions();
    let (x0, y0, x1, y1) = neighbourhood(x, y, width, height);

    let mut zeroes: u8 = u8::from(on_border(x, y, width, height));
    let mut min = 0.0;
    let mut max = 0.0;
    let mut min_at = (0, 0);
    let mut max_at = (0, 0);

    let center = *img.get_pixel(x, y);

    for ny in y0..=y1 {
        for nx in x0..=x1 {
            if nx == x && ny == y {
                continue;
            }

            let delta = color_delta(center, *img.get_pixel(nx, ny), true);

            if delta == 0.0 {
                zeroes += 1;
                // More than two equal siblings: a flat area, not an edge.
                if zeroes > 2 {
                    return false;
                }
            } else if delta < min {
                min = delta;
                min_at = (nx, ny);
            } else if delta > max {
                max = delta;
                max_at = (nx, ny);
            }
        }
    }

    // Anti-aliasing sits between a darker and a brighter neighbour.
    if min == 0.0 || max == 0.0 {
        return false;
    }

    (has_many_siblings(img, min_at.0, min_at.1) && has_many_siblings(other, min_at.0, min_at.1))
        || (has_many_siblings(img, max_at.0, max_at.1)
            && has_many_siblings(other, max_at.0, max_at.1))
}

/// Whether the pixel at `(x, y)` has three or more identical neighbours.
fn has_many_siblings(img: &RgbaImage, x: u32, y: u32) -> bool {
    let (width, height) = img.dimensions();
    let (x0, y0, x1, y1) = neighbourhood(x, y, width, height);

    let mut zeroes: u8 = u8::from(on_border(x, y, width, height));
    let center = img.get_pixel(x, y);

    for ny in y0..=y1 {
        for nx in x0..=x1 {
            if nx == x && ny == y {
                continue;
            }
            if img.get_pixel(nx, ny) == center {
                zeroes += 1;
            }
            if zeroes > 2 {
                return true;
            }
        }
    }

    false
}

/// Squared YIQ distance between two pixels, negative when the second pixel
/// is darker. With `y_only`, returns the signed luminance difference.
///
/// Translucent pixels are blended over white first, so fully transparent
/// pixels of any colour compare equal.
fn color_delta(a: Rgba<u8>, b: Rgba<u8>, y_only: bool) -> f64 {
    if a == b {
        return 0.0;
    }

    let (r1, g1, b1) = blend_white(a);
    let (r2, g2, b2) = blend_white(b);

    let y1 = rgb2y(r1, g1, b1);
    let y2 = rgb2y(r2, g2, b2);
    let y = y1 - y2;

    if y_only {
        return y;
    }

    let i = rgb2i(r1, g1, b1) - rgb2i(r2, g2, b2);
    let q = rgb2q(r1, g1, b1) - rgb2q(r2, g2, b2);

    let delta = 0.5053 * y * y + 0.299 * i * i + 0.1957 * q * q;

    if y1 > y2 { -delta } else { delta }
}

fn blend_white(p: Rgba<u8>) -> (f64, f64, f64) {
    let Rgba([r, g, b, a]) = p;
    let (r, g, b) = (f64::from(r), f64::from(g), f64::from(b));
    if a == 255 {
        return (r, g, b);
    }
    let a = f64::from(a) / 255.0;
    (blend(r, a), blend(g, a), blend(b, a))
}

fn blend(c: f64, a: f64) -> f64 {
    255.0 + (c - 255.0) * a
}

fn rgb2y(r: f64, g: f64, b: f64) -> f64 {
    r * 0.29889531 + g * 0.58662247 + b * 0.11448223
}

fn rgb2i(r: f64, g: f64, b: f64) -> f64 {
    r * 0.59597799 - g * 0.27417610 - b * 0.32180189
}

fn rgb2q(r: f64, g: f64, b: f64) -> f64 {
    r * 0.21147017 - g * 0.52261711 + b * 0.31114694
}
