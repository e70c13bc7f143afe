use std::io::Cursor;

use image::{ImageFormat, RgbaImage};
use serde::Serialize;

use crate::{ComparisonOptions, PixelComparison, RegionAnalysis};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn of(image: &RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self { width, height }
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// Outcome of one comparison. Serializes without the diff image.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffResult {
    pub total_pixels: u64,
    pub diff_pixels: u64,
    /// 0.0 = identical, 100.0 = every pixel differs.
    pub diff_percentage: f64,
    pub passed: bool,
    pub dimensions: Dimensions,
    #[serde(skip)]
    pub diff_image: Option<RgbaImage>,
    /// `None` when region analysis was not requested; `Some(vec![])` when it
    /// ran and found nothing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regions: Option<Vec<RegionAnalysis>>,
}

impl DiffResult {
    /// PNG-encode the diff mask, if one was kept.
    pub fn diff_image_png(&self) -> Option<Result<Vec<u8>, image::ImageError>> {
        self.diff_image.as_ref().map(|img| {
            let mut buf = Vec::new();
            img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
            Ok(buf)
        })
    }
}

/// Combine comparator output and optional regions into a [`DiffResult`].
pub fn aggregate(
    comparison: PixelComparison,
    regions: Option<Vec<RegionAnalysis>>,
    options: &ComparisonOptions,
    dimensions: Dimensions,
) -> DiffResult {
    let total_pixels = dimensions.area();
    let diff_percentage = if total_pixels > 0 {
        comparison.diff_pixels as f64 / total_pixels as f64 * 100.0
    } else {
        0.0
    };
    let passed = diff_percentage <= options.effective_pass_threshold() * 100.0;

    DiffResult {
        total_pixels,
        diff_pixels: comparison.diff_pixels,
        diff_percentage,
        passed,
        dimensions,
        diff_image: options
            .generate_diff_mask
            .then(|| comparison.mask.into_image()),
        regions: if options.analyze_regions { regions } else { None },
    }
}
