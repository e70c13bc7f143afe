pub mod pair;

use vdiff_engine::DiffResult;

/// Status of a single image pair.
#[derive(Debug, PartialEq)]
pub enum PairStatus {
    Pass,
    Fail {
        diff_pixels: u64,
        diff_percentage: f64,
        regions: Option<usize>,
    },
    /// Current image with no reference counterpart.
    New,
    /// The comparison could not run (decode, dimensions, I/O).
    Error(String),
}

impl PairStatus {
    pub fn from_result(result: &DiffResult) -> Self {
        if result.passed {
            return Self::Pass;
        }
        Self::Fail {
            diff_pixels: result.diff_pixels,
            diff_percentage: result.diff_percentage,
            regions: result.regions.as_ref().map(Vec::len),
        }
    }
}
