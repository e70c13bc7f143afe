use serde::{Deserialize, Serialize};

use crate::{DiffError, Result};

/// Colour painted onto matching pixels in the diff mask.
pub const NEUTRAL_COLOR: [u8; 3] = [255, 255, 255];

/// Knobs for a single comparison.
///
/// Deserializes from the `[diff]` table of a config file; unknown keys are
/// rejected rather than ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComparisonOptions {
    /// Per-pixel colour tolerance (0.0-1.0). Smaller is more sensitive.
    /// Also the pass/fail share of differing pixels unless
    /// `pass_threshold` is set.
    pub threshold: f64,
    /// Maximum share of differing pixels (0.0-1.0) for the result to pass.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pass_threshold: Option<f64>,
    /// Count pixels that look like anti-aliasing as differences.
    pub include_anti_aliasing: bool,
    /// Pixel pairs whose alphas both sit at or below this level (0.0-1.0)
    /// are treated as transparent and always match.
    ///
    /// This is an absolute alpha level, not a minimum alpha difference: two
    /// pixels with alphas 0.05 and 0.9 still go through the colour delta
    /// (after blending over white) even with a threshold of 0.5.
    pub alpha_threshold: f64,
    /// Keep the diff mask image on the result.
    pub generate_diff_mask: bool,
    /// RGB colour for differing pixels in the diff mask.
    pub diff_color: [u8; 3],
    /// Group differing pixels into connected regions.
    pub analyze_regions: bool,
    /// Smallest region (in pixels) that gets reported.
    pub region_min_size: u32,
}

impl Default for ComparisonOptions {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            pass_threshold: None,
            include_anti_aliasing: false,
            alpha_threshold: 0.0,
            generate_diff_mask: true,
            diff_color: [255, 0, 0],
            analyze_regions: false,
            region_min_size: 1,
        }
    }
}

impl ComparisonOptions {
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_pass_threshold(mut self, pass_threshold: f64) -> Self {
        self.pass_threshold = Some(pass_threshold);
        self
    }

    /// Enable region analysis, reporting regions of at least `min_size` pixels.
    pub fn with_regions(mut self, min_size: u32) -> Self {
        self.analyze_regions = true;
        self.region_min_size = min_size;
        self
    }

    /// Share of differing pixels (0.0-1.0) that still passes.
    pub fn effective_pass_threshold(&self) -> f64 {
        self.pass_threshold.unwrap_or(self.threshold)
    }

    pub fn validate(&self) -> Result<()> {
        validate_unit("threshold", self.threshold)?;
        if let Some(v) = self.pass_threshold {
            validate_unit("pass_threshold", v)?;
        }
        validate_unit("alpha_threshold", self.alpha_threshold)?;
        if self.region_min_size == 0 {
            return Err(DiffError::InvalidOptions(
                "region_min_size must be at least 1".to_string(),
            ));
        }
        if self.diff_color == NEUTRAL_COLOR {
            return Err(DiffError::InvalidOptions(format!(
                "diff_color must differ from the neutral mask colour {NEUTRAL_COLOR:?}"
            )));
        }
        Ok(())
    }
}

/// Check that `v` lies in 0.0-1.0 (NaN is rejected).
pub fn validate_unit(name: &str, v: f64) -> Result<f64> {
    if !(0.0..=1.0).contains(&v) {
        return Err(DiffError::InvalidOptions(format!(
            "{name} must be between 0.0 and 1.0, got {v}"
        )));
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let o = ComparisonOptions::default();
        o.validate().unwrap();
        assert_eq!(o.effective_pass_threshold(), 0.1);
        assert!(!o.analyze_regions);
    }

    #[test]
    fn pass_threshold_overrides_threshold() {
        let o = ComparisonOptions::default().with_pass_threshold(0.25);
        assert_eq!(o.effective_pass_threshold(), 0.25);
    }

    #[test]
    fn out_of_range_values_rejected() {
        assert!(ComparisonOptions::default().with_threshold(-0.1).validate().is_err());
        assert!(ComparisonOptions::default().with_threshold(f64::NAN).validate().is_err());
        assert!(ComparisonOptions::default().with_pass_threshold(2.0).validate().is_err());
        let o = ComparisonOptions {
            alpha_threshold: 1.01,
            ..ComparisonOptions::default()
        };
        assert!(o.validate().is_err());
    }

    #[test]
    fn zero_region_size_rejected() {
        let o = ComparisonOptions::default().with_regions(0);
        assert!(matches!(o.validate(), Err(DiffError::InvalidOptions(_))));
    }

    #[test]
    fn neutral_diff_color_rejected() {
        let o = ComparisonOptions {
            diff_color: NEUTRAL_COLOR,
            ..ComparisonOptions::default()
        };
        assert!(o.validate().is_err());
    }

    #[test]
    fn unknown_keys_rejected() {
        let err = serde_json::from_str::<ComparisonOptions>(r#"{"treshold": 0.2}"#);
        assert!(err.is_err());
        let ok: ComparisonOptions =
            serde_json::from_str(r#"{"threshold": 0.2, "analyze_regions": true}"#).unwrap();
        assert_eq!(ok.threshold, 0.2);
        assert!(ok.analyze_regions);
        assert_eq!(ok.region_min_size, 1);
    }
}
