use crate::{DiffResult, RegionAnalysis};

/// Coarse bucket for a region's severity, used for badge styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SeverityLevel {
    Low,
    Medium,
    High,
}

impl SeverityLevel {
    fn of(region: &RegionAnalysis) -> Self {
        if region.severity >= 0.05 {
            Self::High
        } else if region.severity >= 0.01 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    fn class(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

/// Image files sitting next to the report, by file name.
pub struct ReportImages<'a> {
    pub comparison: Option<&'a str>,
    pub diff: Option<&'a str>,
}

pub fn build_html(result: &DiffResult, title: &str, images: &ReportImages<'_>) -> String {
    let (banner_class, banner_text) = if result.passed {
        ("pass", "PASSED")
    } else {
        ("fail", "FAILED")
    };

    let mut figures = String::new();
    if let Some(name) = images.comparison {
        figures.push_str(&figure("Comparison", name));
    }
    if let Some(name) = images.diff {
        figures.push_str(&figure("Difference mask", name));
    }

    let regions = match &result.regions {
        None => String::new(),
        Some(regions) if regions.is_empty() => {
            r#"<h2>Regions</h2>
  <div class="empty">No differing regions.</div>"#
                .to_string()
        }
        Some(regions) => region_table(regions),
    };

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <title>{title} &middot; visual diff</title>
  <style>
    :root {{ color-scheme: light; }}
    body {{
      font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", sans-serif;
      margin: 0; padding: 24px;
      background: #f6f7f9; color: #1f2933;
    }}
    h1 {{ margin: 0 0 8px; font-size: 22px; }}
    h2 {{ margin: 24px 0 8px; font-size: 17px; }}
    .meta {{ margin-bottom: 16px; color: #52606d; font-size: 14px; }}
    .banner {{ padding: 12px 16px; border-radius: 4px; font-weight: 600; margin-bottom: 16px; }}
    .banner.pass {{ background: #def7ec; color: #03543f; }}
    .banner.fail {{ background: #fde8e8; color: #9b1c1c; }}
    table {{ border-collapse: collapse; background: #fff; box-shadow: 0 2px 6px rgba(0,0,0,0.05); }}
    th, td {{ border: 1px solid #e4e7eb; padding: 6px 10px; text-align: left; font-size: 14px; }}
    th {{ background: #f0f4f8; font-weight: 600; }}
    figure {{ margin: 16px 0; }}
    figure img {{ max-width: 100%; height: auto; display: block; background: #fff; }}
    figcaption {{ color: #52606d; font-size: 13px; margin-top: 4px; }}
    .badge {{ font-size: 11px; padding: 1px 6px; border-radius: 3px; font-weight: 600; }}
    .badge.low {{ background: #e1effe; color: #1e429f; }}
    .badge.medium {{ background: #fef3c7; color: #92400e; }}
    .badge.high {{ background: #fde8e8; color: #9b1c1c; }}
    .empty {{ padding: 16px; color: #52606d; }}
  </style>
</head>
<body>
  <h1>{title}</h1>
  <div class="meta">Generated at {created_at}</div>
  <div class="banner {banner_class}">{banner_text}: {percentage:.4}% of pixels differ</div>
  <table>
    <tr><th>Dimensions</th><td>{width}x{height}</td></tr>
    <tr><th>Total pixels</th><td>{total}</td></tr>
    <tr><th>Different pixels</th><td>{diff}</td></tr>
    <tr><th>Difference</th><td>{percentage:.4}%</td></tr>
  </table>
  {figures}
  {regions}
</body>
</html>"##,
        title = html_escape(title),
        created_at = timestamp(),
        percentage = result.diff_percentage,
        width = result.dimensions.width,
        height = result.dimensions.height,
        total = result.total_pixels,
        diff = result.diff_pixels,
    )
}

fn figure(caption: &str, file_name: &str) -> String {
    format!(
        r#"<figure>
    <img src="{src}" alt="{caption}" />
    <figcaption>{caption}</figcaption>
  </figure>
  "#,
        src = url_encode(file_name),
    )
}

fn region_table(regions: &[RegionAnalysis]) -> String {
    let mut rows = String::new();
    for (i, r) in regions.iter().enumerate() {
        let level = SeverityLevel::of(r);
        rows.push_str(&format!(
            r#"      <tr>
        <td>{n}</td>
        <td>({x}, {y})</td>
        <td>{w}x{h}</td>
        <td>{pixels}</td>
        <td>{severity:.4}% <span class="badge {class}">{label}</span></td>
      </tr>
"#,
            n = i + 1,
            x = r.x,
            y = r.y,
            w = r.width,
            h = r.height,
            pixels = r.pixel_count,
            severity = r.severity * 100.0,
            class = level.class(),
            label = level.label(),
        ));
    }

    format!(
        r#"<h2>Regions ({count})</h2>
  <table>
    <thead>
      <tr>
        <th>#</th>
        <th>Position</th>
        <th>Size</th>
        <th>Pixels</th>
        <th>Severity</th>
      </tr>
    </thead>
    <tbody>
{rows}    </tbody>
  </table>"#,
        count = regions.len(),
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn url_encode(s: &str) -> String {
    s.bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                String::from(b as char)
            }
            _ => format!("%{:02X}", b),
        })
        .collect()
}

fn timestamp() -> String {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let (s, m, h) = (secs % 60, (secs / 60) % 60, (secs / 3600) % 24);
    let (y, mo, d) = epoch_days_to_ymd(secs / 86400);
    format!("{y:04}-{mo:02}-{d:02}T{h:02}:{m:02}:{s:02}Z")
}

/// Convert days since Unix epoch to (year, month, day).
fn epoch_days_to_ymd(mut days: u64) -> (u64, u64, u64) {
    // Civil calendar algorithm (Howard Hinnant)
    days += 719468;
    let era = days / 146097;
    let doe = days - era * 146097;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let y = if m <= 2 { y + 1 } else { y };
    (y, m, d)
}
