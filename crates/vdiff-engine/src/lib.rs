//! Visual difference engine.
//!
//! Compares two equally sized RGBA images pixel by pixel, optionally groups
//! the differing pixels into connected regions, and renders the outcome as
//! PNG/HTML/JSON artifacts.
//!
//! ```no_run
//! use vdiff_engine::{ComparisonOptions, compare_images};
//!
//! let expected = image::open("expected.png").unwrap().to_rgba8();
//! let actual = image::open("actual.png").unwrap().to_rgba8();
//! let options = ComparisonOptions::default().with_regions(4);
//! let result = compare_images(&expected, &actual, &options).unwrap();
//! println!("{:.2}% different", result.diff_percentage);
//! ```

use std::path::PathBuf;

use image::RgbaImage;
use thiserror::Error;
use tracing::debug;

pub mod options;
pub mod pixel;
pub mod region;
pub mod render;
pub mod result;

pub use self::options::ComparisonOptions;
pub use self::pixel::{DiffMask, PixelComparison};
pub use self::region::RegionAnalysis;
pub use self::render::{SavedArtifacts, render_artifacts, save_comparison_image, save_diff_result};
pub use self::result::{DiffResult, Dimensions};

#[derive(Debug, Error)]
pub enum DiffError {
    #[error("dimension mismatch: {left_w}x{left_h} vs {right_w}x{right_h}")]
    DimensionMismatch {
        left_w: u32,
        left_h: u32,
        right_w: u32,
        right_h: u32,
    },

    #[error("failed to decode {which} image")]
    Decode {
        which: &'static str,
        #[source]
        source: image::ImageError,
    },

    #[error("invalid options: {0}")]
    InvalidOptions(String),

    #[error("filesystem error at {}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode {}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to serialize result")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DiffError>;

/// Compare two decoded images.
///
/// Runs synchronously and touches no shared state, so callers may run any
/// number of comparisons in parallel.
pub fn compare_images(
    expected: &RgbaImage,
    actual: &RgbaImage,
    options: &ComparisonOptions,
) -> Result<DiffResult> {
    options.validate()?;
    let comparison = pixel::compare(expected, actual, options)?;

    let regions = if options.analyze_regions {
        Some(region::analyze_regions(
            &comparison.mask,
            options.region_min_size,
        ))
    } else {
        None
    };

    let dimensions = Dimensions::of(expected);
    debug!(
        width = dimensions.width,
        height = dimensions.height,
        diff_pixels = comparison.diff_pixels,
        regions = regions.as_ref().map(Vec::len),
        "compared images"
    );

    Ok(result::aggregate(comparison, regions, options, dimensions))
}

/// Compare with default options and a single `threshold`.
pub fn quick_diff(expected: &RgbaImage, actual: &RgbaImage, threshold: f64) -> Result<DiffResult> {
    let options = ComparisonOptions {
        threshold,
        ..ComparisonOptions::default()
    };
    compare_images(expected, actual, &options)
}

/// Decode two encoded images (PNG or any format `image` can sniff) and
/// compare them.
pub fn compare_png(
    expected_png: &[u8],
    actual_png: &[u8],
    options: &ComparisonOptions,
) -> Result<DiffResult> {
    let expected = decode(expected_png, "expected")?;

    // Byte-identical inputs decode to the same pixels: reuse the first decode.
    if expected_png == actual_png {
        return compare_images(&expected, &expected, options);
    }

    let actual = decode(actual_png, "actual")?;
    compare_images(&expected, &actual, options)
}

/// Decode an encoded image buffer into RGBA8.
pub fn decode(bytes: &[u8], which: &'static str) -> Result<RgbaImage> {
    image::load_from_memory(bytes)
        .map(|img| img.to_rgba8())
        .map_err(|source| DiffError::Decode { which, source })
}
