use vdiff_engine::ComparisonOptions;

fn parse_unit(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|e| format!("{e}"))?;
    vdiff_engine::options::validate_unit("value", v).map_err(|e| e.to_string())
}

/// Accepts `#rrggbb`, `rrggbb` or `r,g,b`.
pub fn parse_color(s: &str) -> Result<[u8; 3], String> {
    if s.contains(',') {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let [r, g, b] = parts.as_slice() else {
            return Err(format!("expected r,g,b, got {s:?}"));
        };
        let channel = |c: &str| c.parse::<u8>().map_err(|e| format!("{c:?}: {e}"));
        return Ok([channel(*r)?, channel(*g)?, channel(*b)?]);
    }

    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(format!("expected #rrggbb, got {s:?}"));
    }
    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16).map_err(|e| format!("{s:?}: {e}"))
    };
    Ok([channel(0)?, channel(2)?, channel(4)?])
}

/// Comparison flags shared by `compare` and `batch`.
///
/// Every field is optional; `None` keeps the value from the config file.
#[derive(Clone, Debug, Default, clap::Args)]
pub struct DiffArgs {
    /// Per-pixel colour tolerance (0.0-1.0)
    #[arg(long, short = 't', value_parser = parse_unit)]
    pub threshold: Option<f64>,

    /// Max share of differing pixels (0.0-1.0) that still passes
    #[arg(long, value_parser = parse_unit)]
    pub pass_threshold: Option<f64>,

    /// Count anti-aliasing pixels as differences
    #[arg(long)]
    pub include_aa: bool,

    /// Treat pixels with alpha at or below this level (0.0-1.0) as transparent
    #[arg(long, value_parser = parse_unit)]
    pub alpha_threshold: Option<f64>,

    /// Colour for differing pixels in the diff mask (#rrggbb or r,g,b)
    #[arg(long, value_parser = parse_color)]
    pub diff_color: Option<[u8; 3]>,

    /// Do not produce a diff mask image
    #[arg(long)]
    pub no_diff_mask: bool,

    /// Report connected regions of at least N pixels
    #[arg(long, value_name = "N")]
    pub regions: Option<u32>,
}

impl DiffArgs {
    /// Overlay set flags onto `options`.
    pub fn apply(&self, options: &mut ComparisonOptions) {
        if let Some(v) = self.threshold {
            options.threshold = v;
        }
        if let Some(v) = self.pass_threshold {
            options.pass_threshold = Some(v);
        }
        if self.include_aa {
            options.include_anti_aliasing = true;
        }
        if let Some(v) = self.alpha_threshold {
            options.alpha_threshold = v;
        }
        if let Some(v) = self.diff_color {
            options.diff_color = v;
        }
        if self.no_diff_mask {
            options.generate_diff_mask = false;
        }
        if let Some(n) = self.regions {
            options.analyze_regions = true;
            options.region_min_size = n;
        }
    }
}
