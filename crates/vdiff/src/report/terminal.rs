use std::io::Write;
use std::time::Duration;

use vdiff_engine::{DiffResult, SavedArtifacts};

use crate::compare::PairStatus;

/// Regions listed by `print_result` before eliding the rest.
const MAX_LISTED_REGIONS: usize = 10;

/// Clear the current terminal line (wipes progress indicator).
pub fn clear_line() {
    print!("\r\x1b[2K");
}

pub fn format_duration(d: Duration) -> String {
    let ms = d.as_millis();
    if ms < 1000 {
        format!("{ms}ms")
    } else {
        format!("{:.1}s", d.as_secs_f64())
    }
}

/// Print a single pair result line.
pub fn print_line(name: &str, status: &PairStatus, elapsed: Duration) {
    clear_line();
    let time_suffix = format!("  \x1b[2m{}\x1b[0m", format_duration(elapsed));

    match status {
        PairStatus::Pass => {
            println!("  \x1b[32mPASS\x1b[0m  {name}{time_suffix}");
        }
        PairStatus::Fail {
            diff_pixels,
            diff_percentage,
            regions,
        } => {
            let regions = regions.map(|n| format!(", {n} regions")).unwrap_or_default();
            println!(
                "  \x1b[31mFAIL\x1b[0m  {name}  ({diff_pixels} pixels, {diff_percentage:.4}%{regions}){time_suffix}"
            );
        }
        PairStatus::New => {
            println!("  \x1b[33m NEW\x1b[0m  {name}  (no reference){time_suffix}");
        }
        PairStatus::Error(msg) => {
            println!("  \x1b[31m ERR\x1b[0m  {name}  ({msg}){time_suffix}");
        }
    }
}

/// Print a reference that has no current counterpart.
pub fn print_orphan_line(name: &str) {
    clear_line();
    println!("  \x1b[2mGONE\x1b[0m  \x1b[2m{name}  (no current image)\x1b[0m");
}

/// Show comparison progress indicator.
pub fn show_progress(done: usize, total: usize) {
    if done < total {
        print!("  Comparing  [{done}/{total}]");
        let _ = std::io::stdout().flush();
    }
}

/// Detailed result of a single comparison.
pub fn print_result(result: &DiffResult, elapsed: Duration) {
    let (w, h) = (result.dimensions.width, result.dimensions.height);
    let verdict = if result.passed {
        "\x1b[32mPASS\x1b[0m"
    } else {
        "\x1b[31mFAIL\x1b[0m"
    };
    println!(
        "{verdict}  {} of {} pixels differ ({:.4}%), {w}x{h}, {}",
        result.diff_pixels,
        result.total_pixels,
        result.diff_percentage,
        format_duration(elapsed),
    );

    let Some(regions) = &result.regions else {
        return;
    };
    println!("Regions:    {}", regions.len());
    for (i, r) in regions.iter().take(MAX_LISTED_REGIONS).enumerate() {
        println!(
            "  {:>3}. ({}, {}) {}x{}  {} pixels  {:.4}%",
            i + 1,
            r.x,
            r.y,
            r.width,
            r.height,
            r.pixel_count,
            r.severity * 100.0,
        );
    }
    if regions.len() > MAX_LISTED_REGIONS {
        println!("  ... {} more", regions.len() - MAX_LISTED_REGIONS);
    }
}

pub fn print_artifacts(saved: &SavedArtifacts) {
    println!();
    println!("Artifacts:");
    for path in [&saved.diff_image_path, &saved.comparison_path]
        .into_iter()
        .flatten()
        .chain([&saved.report_path, &saved.json_path])
    {
        println!("  {}", path.display());
    }
}

/// Print an actionable summary listing pair names grouped by status.
/// Only prints sections with at least one entry.
pub fn print_actionable_summary(
    failed: &[String],
    new: &[String],
    errored: &[String],
    orphaned: &[String],
) {
    if failed.is_empty() && new.is_empty() && errored.is_empty() && orphaned.is_empty() {
        return;
    }

    clear_line();
    println!();
    println!("Actionable images:");

    for (label, names) in [
        ("Failed", failed),
        ("New", new),
        ("Errored", errored),
        ("Orphaned", orphaned),
    ] {
        if !names.is_empty() {
            println!();
            println!("  {label} ({}):", names.len());
            for name in names {
                println!("    {name}");
            }
        }
    }
}

/// Totals for the final batch summary.
#[derive(Debug, Default)]
pub struct Tally {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub new: usize,
    pub errored: usize,
    pub orphaned: usize,
}

impl Tally {
    pub fn record(&mut self, status: &PairStatus) {
        match status {
            PairStatus::Pass => self.passed += 1,
            PairStatus::Fail { .. } => self.failed += 1,
            PairStatus::New => self.new += 1,
            PairStatus::Error(_) => self.errored += 1,
        }
    }
}

/// Print the final summary.
pub fn print_summary(tally: &Tally, output_dir: &std::path::Path, elapsed: Duration) {
    let Tally {
        total,
        passed,
        failed,
        new,
        errored,
        orphaned,
    } = tally;

    clear_line();
    println!();
    print!(
        "Images:     {total} total, \x1b[32m{passed} passed\x1b[0m, \x1b[31m{failed} failed\x1b[0m, \x1b[33m{new} new\x1b[0m"
    );
    if *errored > 0 {
        print!(", \x1b[31m{errored} errored\x1b[0m");
    }
    if *orphaned > 0 {
        print!(", \x1b[2m{orphaned} orphaned\x1b[0m");
    }
    println!();
    println!("Time:       {}", format_duration(elapsed));

    if *failed > 0 || *new > 0 || *errored > 0 || *orphaned > 0 {
        println!();
        if *failed > 0 {
            println!(
                "{failed} image(s) have visual differences. Reports are in {}.",
                output_dir.display()
            );
        }
        if *new > 0 {
            println!("{new} image(s) have no reference.");
        }
        if *errored > 0 {
            println!("{errored} image(s) could not be compared.");
        }
        if *orphaned > 0 {
            println!("{orphaned} reference(s) have no current image.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_format() {
        assert_eq!(format_duration(Duration::from_millis(12)), "12ms");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.5s");
    }

    #[test]
    fn tally_counts_by_status() {
        let mut t = Tally::default();
        t.record(&PairStatus::Pass);
        t.record(&PairStatus::New);
        t.record(&PairStatus::Error("x".into()));
        t.record(&PairStatus::Fail {
            diff_pixels: 1,
            diff_percentage: 1.0,
            regions: None,
        });
        assert_eq!((t.passed, t.failed, t.new, t.errored), (1, 1, 1, 1));
    }
}
