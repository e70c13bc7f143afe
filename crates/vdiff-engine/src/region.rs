//! Connected regions of differing pixels.

use serde::{Deserialize, Serialize};

use crate::DiffMask;

/// One 4-connected group of differing pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionAnalysis {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Differing pixels in the region, not the bounding-box area.
    pub pixel_count: u64,
    /// `pixel_count` over the whole image area, in 0.0-1.0.
    pub severity: f64,
}

/// Running bounding box for a region under construction.
struct Bounds {
    min_x: u32,
    min_y: u32,
    max_x: u32,
    max_y: u32,
}

impl Bounds {
    fn at(x: u32, y: u32) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    fn include(&mut self, x: u32, y: u32) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }
}

/// Group the differing pixels of `mask` into connected regions.
///
/// Regions smaller than `min_size` pixels are dropped. The result is sorted
/// by descending severity; equal severities keep row-major discovery order.
pub fn analyze_regions(mask: &DiffMask, min_size: u32) -> Vec<RegionAnalysis> {
    let (w, h) = (mask.width(), mask.height());
    let total_pixels = u64::from(w) * u64::from(h);
    let mut visited = vec![false; total_pixels as usize];
    let mut stack: Vec<(u32, u32)> = Vec::new();
    let mut regions = Vec::new();

    let index = |x: u32, y: u32| (y as usize) * (w as usize) + x as usize;

    for y in 0..h {
        for x in 0..w {
            if visited[index(x, y)] || !mask.is_diff(x, y) {
                continue;
            }

            visited[index(x, y)] = true;
            stack.push((x, y));
            let mut bounds = Bounds::at(x, y);
            let mut pixel_count: u64 = 0;

            while let Some((cx, cy)) = stack.pop() {
                pixel_count += 1;
                bounds.include(cx, cy);

                let neighbours = [
                    (cx > 0).then(|| (cx - 1, cy)),
                    (cx + 1 < w).then(|| (cx + 1, cy)),
                    (cy > 0).then(|| (cx, cy - 1)),
                    (cy + 1 < h).then(|| (cx, cy + 1)),
                ];
                for (nx, ny) in neighbours.into_iter().flatten() {
                    let i = index(nx, ny);
                    if !visited[i] && mask.is_diff(nx, ny) {
                        visited[i] = true;
                        stack.push((nx, ny));
                    }
                }
            }

            if pixel_count < u64::from(min_size) {
                continue;
            }

            regions.push(RegionAnalysis {
                x: bounds.min_x,
                y: bounds.min_y,
                width: bounds.max_x - bounds.min_x + 1,
                height: bounds.max_y - bounds.min_y + 1,
                pixel_count,
                severity: (pixel_count as f64 / total_pixels as f64).clamp(0.0, 1.0),
            });
        }
    }

    // Stable sort keeps discovery order for ties.
    regions.sort_by(|a, b| b.severity.total_cmp(&a.severity));
    regions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ComparisonOptions;
    use crate::pixel;
    use image::{Rgba, RgbaImage};

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    /// Build a mask by comparing an all-white image against one with the
    /// given pixels blacked out.
    fn mask_with(w: u32, h: u32, pixels: &[(u32, u32)]) -> DiffMask {
        let a = RgbaImage::from_pixel(w, h, WHITE);
        let mut b = a.clone();
        for &(x, y) in pixels {
            b.put_pixel(x, y, BLACK);
        }
        let options = ComparisonOptions {
            threshold: 0.0,
            include_anti_aliasing: true,
            ..ComparisonOptions::default()
        };
        pixel::compare(&a, &b, &options).unwrap().mask
    }

    #[test]
    fn clean_mask_has_no_regions() {
        assert!(analyze_regions(&mask_with(10, 10, &[]), 1).is_empty());
    }

    #[test]
    fn single_pixel_region() {
        let regions = analyze_regions(&mask_with(10, 10, &[(5, 5)]), 1);
        assert_eq!(regions.len(), 1);
        let r = &regions[0];
        assert_eq!((r.x, r.y, r.width, r.height), (5, 5, 1, 1));
        assert_eq!(r.pixel_count, 1);
        assert!((r.severity - 0.01).abs() < 1e-12);
    }

    #[test]
    fn diagonal_pixels_are_separate_regions() {
        let regions = analyze_regions(&mask_with(4, 4, &[(0, 0), (1, 1)]), 1);
        assert_eq!(regions.len(), 2);
        // Equal severity: discovery order.
        assert_eq!((regions[0].x, regions[0].y), (0, 0));
        assert_eq!((regions[1].x, regions[1].y), (1, 1));
    }

    #[test]
    fn l_shape_counts_pixels_not_box_area() {
        let mask = mask_with(6, 6, &[(1, 1), (1, 2), (1, 3), (2, 3), (3, 3)]);
        let regions = analyze_regions(&mask, 1);
        assert_eq!(regions.len(), 1);
        let r = &regions[0];
        assert_eq!((r.x, r.y, r.width, r.height), (1, 1, 3, 3));
        assert_eq!(r.pixel_count, 5);
    }

    #[test]
    fn small_regions_dropped() {
        let pixels = [(0, 0), (5, 5), (6, 5), (7, 5)];
        let regions = analyze_regions(&mask_with(10, 10, &pixels), 2);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].pixel_count, 3);
        assert!(regions.iter().all(|r| r.pixel_count >= 2));
    }

    #[test]
    fn sorted_by_descending_severity() {
        let pixels = [(0, 0), (3, 3), (4, 3), (8, 8), (8, 9), (9, 8), (9, 9)];
        let regions = analyze_regions(&mask_with(10, 10, &pixels), 1);
        let counts: Vec<u64> = regions.iter().map(|r| r.pixel_count).collect();
        assert_eq!(counts, vec![4, 2, 1]);
        assert!(regions.windows(2).all(|w| w[0].severity >= w[1].severity));
    }

    #[test]
    fn full_image_region_handles_large_areas() {
        let pixels: Vec<(u32, u32)> = (0..300)
            .flat_map(|y| (0..300).map(move |x| (x, y)))
            .collect();
        let regions = analyze_regions(&mask_with(300, 300, &pixels), 1);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].pixel_count, 90_000);
        assert_eq!(regions[0].severity, 1.0);
    }
}
