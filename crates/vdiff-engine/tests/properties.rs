use image::{Rgba, RgbaImage};
use vdiff_engine::{ComparisonOptions, DiffError, compare_images, quick_diff};

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Deterministic pseudo-random noise image.
fn noise(w: u32, h: u32, seed: u32) -> RgbaImage {
    RgbaImage::from_fn(w, h, |x, y| {
        let v = (x.wrapping_mul(7919) ^ y.wrapping_mul(6271) ^ seed.wrapping_mul(104_729))
            .wrapping_mul(2_654_435_761);
        Rgba([(v >> 24) as u8, (v >> 16) as u8, (v >> 8) as u8, 255])
    })
}

fn with_regions(threshold: f64) -> ComparisonOptions {
    ComparisonOptions::default()
        .with_threshold(threshold)
        .with_regions(1)
}

#[test]
fn identical_solid_red_passes() {
    let img = RgbaImage::from_pixel(100, 100, Rgba([255, 0, 0, 255]));
    let r = compare_images(&img, &img, &with_regions(0.1)).unwrap();
    assert_eq!(r.total_pixels, 10_000);
    assert_eq!(r.diff_pixels, 0);
    assert_eq!(r.diff_percentage, 0.0);
    assert!(r.passed);
    assert_eq!(r.regions, Some(Vec::new()));
}

#[test]
fn identity_on_noise() {
    let img = noise(64, 48, 1);
    let r = compare_images(&img, &img, &with_regions(0.0)).unwrap();
    assert_eq!(r.diff_pixels, 0);
    assert!(r.passed);
    assert_eq!(r.regions, Some(Vec::new()));
}

#[test]
fn single_black_pixel() {
    let a = RgbaImage::from_pixel(10, 10, WHITE);
    let mut b = a.clone();
    b.put_pixel(5, 5, BLACK);
    let r = compare_images(&a, &b, &with_regions(0.0)).unwrap();
    assert_eq!(r.diff_pixels, 1);
    let regions = r.regions.unwrap();
    assert_eq!(regions.len(), 1);
    let region = &regions[0];
    assert_eq!(region.pixel_count, 1);
    assert_eq!((region.x, region.y, region.width, region.height), (5, 5, 1, 1));
}

#[test]
fn bottom_half_black() {
    let split = RgbaImage::from_fn(10, 10, |_, y| if y < 5 { WHITE } else { BLACK });
    let white = RgbaImage::from_pixel(10, 10, WHITE);
    let r = compare_images(&split, &white, &with_regions(0.0)).unwrap();
    assert_eq!(r.diff_pixels, 50);
    let regions = r.regions.unwrap();
    assert_eq!(regions.len(), 1);
    let region = &regions[0];
    assert_eq!((region.x, region.y, region.width, region.height), (0, 5, 10, 5));
    assert_eq!(region.pixel_count, 50);
    assert!((region.severity - 0.5).abs() < 1e-12);
}

#[test]
fn symmetric_diff_counts() {
    let a = noise(40, 30, 1);
    let b = noise(40, 30, 2);
    for include_anti_aliasing in [false, true] {
        let options = ComparisonOptions {
            include_anti_aliasing,
            ..ComparisonOptions::default()
        };
        let ab = compare_images(&a, &b, &options).unwrap();
        let ba = compare_images(&b, &a, &options).unwrap();
        assert_eq!(ab.diff_pixels, ba.diff_pixels);
    }
}

#[test]
fn diff_pixels_bounded_by_total() {
    let a = noise(33, 17, 3);
    let b = noise(33, 17, 4);
    let r = compare_images(&a, &b, &with_regions(0.0)).unwrap();
    assert_eq!(r.total_pixels, 33 * 17);
    assert!(r.diff_pixels <= r.total_pixels);
}

#[test]
fn regions_partition_flagged_pixels() {
    let a = noise(50, 50, 5);
    let b = noise(50, 50, 6);

    // With no size floor every flagged pixel lands in exactly one region.
    let r = compare_images(&a, &b, &with_regions(0.2)).unwrap();
    let regions = r.regions.unwrap();
    let sum: u64 = regions.iter().map(|g| g.pixel_count).sum();
    assert_eq!(sum, r.diff_pixels);

    let options = ComparisonOptions::default()
        .with_threshold(0.2)
        .with_regions(3);
    let r = compare_images(&a, &b, &options).unwrap();
    let regions = r.regions.unwrap();
    let sum: u64 = regions.iter().map(|g| g.pixel_count).sum();
    assert!(sum <= r.diff_pixels);
    assert!(regions.iter().all(|g| g.pixel_count >= 3));
    assert!(regions.iter().all(|g| g.pixel_count <= u64::from(g.width * g.height)));
    assert!(regions.windows(2).all(|w| w[0].severity >= w[1].severity));
}

#[test]
fn threshold_is_monotonic() {
    let a = noise(40, 40, 7);
    let b = noise(40, 40, 8);
    let mut previous = u64::MAX;
    for step in 0..=10 {
        let threshold = f64::from(step) / 10.0;
        let r = quick_diff(&a, &b, threshold).unwrap();
        assert!(r.diff_pixels <= previous, "threshold {threshold}");
        previous = r.diff_pixels;
    }
}

#[test]
fn mismatched_dimensions_fail() {
    let a = RgbaImage::from_pixel(10, 10, WHITE);
    let b = RgbaImage::from_pixel(20, 20, WHITE);
    let err = compare_images(&a, &b, &ComparisonOptions::default()).unwrap_err();
    assert!(matches!(err, DiffError::DimensionMismatch { .. }));
}

#[test]
fn repeated_comparisons_are_identical() {
    let a = noise(30, 30, 9);
    let b = noise(30, 30, 10);
    let options = with_regions(0.05);
    let first = compare_images(&a, &b, &options).unwrap();
    let second = compare_images(&a, &b, &options).unwrap();
    assert_eq!(first, second);
}

#[test]
fn failing_comparison_is_not_an_error() {
    let a = RgbaImage::from_pixel(10, 10, WHITE);
    let b = RgbaImage::from_pixel(10, 10, BLACK);
    let r = quick_diff(&a, &b, 0.1).unwrap();
    assert_eq!(r.diff_pixels, 100);
    assert!(!r.passed);
}
