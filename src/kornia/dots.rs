//! Finds kolam dots in a photographed or scanned image.
//!
//! The image is converted to grayscale, binarised with an Otsu threshold and
//! normalised so dots are foreground. Each 4-connected foreground component
//! whose area falls inside the configured range becomes one dot.

use std::collections::VecDeque;
use std::f32::consts::PI;

use image::{DynamicImage, GrayImage, Rgba};
use imageproc::{contrast::otsu_level, drawing::draw_filled_circle_mut};
use kornia::{
    image::{Image, ImageError, ImageSize, allocator::CpuAllocator},
    imgproc,
};
use serde::{Deserialize, Serialize};

use crate::grid::Point;

type CpuImage<T, const C: usize> = Image<T, C, CpuAllocator>;

const MIN_COMPONENT_PIXELS: usize = 8;
const MAX_COMPONENT_PIXELS: usize = 2000;
const CENTRALITY_THRESHOLD: f32 = 0.55;
const OVERLAY_RADIUS: i32 = 5;
const OVERLAY_COLOR: Rgba<u8> = Rgba([0, 200, 0, 255]);

/// Detection thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DotConfig {
    /// Smallest component area, in pixels, accepted as a dot.
    pub min_component_pixels: usize,
    /// Largest component area; bigger blobs are strokes or smudges.
    pub max_component_pixels: usize,
    /// Half the L1 shift between the plain and darkness-weighted centroids
    /// above which the weighted one is used alone.
    pub centrality_threshold: f32,
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            min_component_pixels: MIN_COMPONENT_PIXELS,
            max_component_pixels: MAX_COMPONENT_PIXELS,
            centrality_threshold: CENTRALITY_THRESHOLD,
        }
    }
}

/// A detected dot: centre and an approximate radius.
#[derive(Debug, Clone, PartialEq)]
pub struct DotDetection {
    pub center: (f32, f32),
    pub radius: f32,
    pub area: usize,
}

impl From<&DotDetection> for Point {
    fn from(d: &DotDetection) -> Self {
        Point::from(d.center)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error("kornia image error: {0}")]
    Kornia(#[from] ImageError),
    #[error("grayscale buffer does not match a {0}x{1} image")]
    GrayBuffer(u32, u32),
}

/// Detects dots and returns them in raster-scan order of their first pixel.
pub fn detect_dots(
    source: &DynamicImage,
    config: &DotConfig,
) -> Result<Vec<DotDetection>, DetectionError> {
    let rgb = source.to_rgb8();
    let (width, height) = rgb.dimensions();
    if width == 0 || height == 0 {
        return Ok(Vec::new());
    }

    let image = CpuImage::<u8, 3>::new(
        ImageSize {
            width: width as usize,
            height: height as usize,
        },
        rgb.into_raw(),
        CpuAllocator,
    )?;
    let mut gray = CpuImage::<u8, 1>::from_size_val(image.size(), 0u8, CpuAllocator)?;
    imgproc::color::gray_from_rgb_u8(&image, &mut gray)?;

    let threshold = dot_threshold(gray.as_slice(), width, height)?;
    let mut binary = CpuImage::<u8, 1>::from_size_val(gray.size(), 0u8, CpuAllocator)?;
    imgproc::threshold::threshold_binary(&gray, &mut binary, threshold, 255)?;

    let mut mask = binary.as_slice().to_vec();
    if invert_if_mostly_set(&mut mask) {
        log::debug!("dark background: mask inverted");
    }

    let dots = extract_components(
        &mask,
        gray.as_slice(),
        width as usize,
        height as usize,
        config,
    );
    log::debug!(
        "otsu threshold {threshold}, {} dots in {width}x{height} image",
        dots.len()
    );
    Ok(dots)
}

/// Returns a copy of `source` with a filled marker on every detected dot.
pub fn annotate_dots(source: &DynamicImage, dots: &[DotDetection]) -> DynamicImage {
    let mut canvas = source.to_rgba8();
    for d in dots {
        let center = (d.center.0.round() as i32, d.center.1.round() as i32);
        draw_filled_circle_mut(&mut canvas, center, OVERLAY_RADIUS, OVERLAY_COLOR);
    }
    DynamicImage::ImageRgba8(canvas)
}

/// Otsu level of the grayscale page.
fn dot_threshold(gray: &[u8], width: u32, height: u32) -> Result<u8, DetectionError> {
    let page = GrayImage::from_raw(width, height, gray.to_vec())
        .ok_or(DetectionError::GrayBuffer(width, height))?;
    Ok(otsu_level(&page))
}

/// Kolam dots cover well under half of the page. A mask with set pixels in
/// the majority has the page as foreground and is inverted. Returns whether
/// it was.
fn invert_if_mostly_set(mask: &mut [u8]) -> bool {
    let set = mask.iter().filter(|&&v| v != 0).count();
    let invert = !mask.is_empty() && set * 2 >= mask.len();
    if invert {
        mask.iter_mut().for_each(|v| *v = !*v);
    }
    invert
}

fn extract_components(
    mask: &[u8],
    grayscale: &[u8],
    width: usize,
    height: usize,
    config: &DotConfig,
) -> Vec<DotDetection> {
    let mut visited = vec![false; mask.len()];
    let mut out = Vec::new();
    let mut rejected = 0usize;

    for start in 0..mask.len() {
        if mask[start] == 0 || visited[start] {
            continue;
        }

        let mut queue = VecDeque::new();
        queue.push_back(start);
        visited[start] = true;

        let mut sum_x = 0f64;
        let mut sum_y = 0f64;
        let mut weighted_x = 0f64;
        let mut weighted_y = 0f64;
        let mut weight_sum = 0f64;
        let mut count = 0usize;

        while let Some(idx) = queue.pop_front() {
            let y = idx / width;
            let x = idx % width;
            sum_x += x as f64;
            sum_y += y as f64;
            count += 1;

            // Darker pixels pull the centroid towards the inked core.
            let intensity = grayscale
                .get(idx)
                .map_or(1.0, |&v| (255.0 - v as f64).max(1.0));
            weighted_x += x as f64 * intensity;
            weighted_y += y as f64 * intensity;
            weight_sum += intensity;

            for (dx, dy) in [(-1isize, 0isize), (1, 0), (0, -1), (0, 1)] {
                let nx = x as isize + dx;
                let ny = y as isize + dy;
                if nx < 0 || ny < 0 || nx as usize >= width || ny as usize >= height {
                    continue;
                }
                let next = ny as usize * width + nx as usize;
                if mask[next] == 0 || visited[next] {
                    continue;
                }
                visited[next] = true;
                queue.push_back(next);
            }
        }

        if !(config.min_component_pixels..=config.max_component_pixels).contains(&count) {
            rejected += 1;
            continue;
        }

        let uniform = (
            (sum_x / count as f64) as f32,
            (sum_y / count as f64) as f32,
        );
        let weighted = if weight_sum > 0.0 {
            (
                (weighted_x / weight_sum) as f32,
                (weighted_y / weight_sum) as f32,
            )
        } else {
            uniform
        };
        out.push(DotDetection {
            center: settle_center(uniform, weighted, config.centrality_threshold),
            radius: (count as f32 / PI).sqrt(),
            area: count,
        });
    }

    if rejected > 0 {
        log::debug!("rejected {rejected} components outside the dot area range");
    }
    out
}

/// Midpoint of the plain and darkness-weighted centroids, or the weighted
/// one alone when they sit more than `max_shift` apart (half L1 distance).
fn settle_center(plain: (f32, f32), weighted: (f32, f32), max_shift: f32) -> (f32, f32) {
    let (dx, dy) = (weighted.0 - plain.0, weighted.1 - plain.1);
    if (dx.abs() + dy.abs()) * 0.5 > max_shift {
        weighted
    } else {
        (plain.0 + dx * 0.5, plain.1 + dy * 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_separates_ink_from_paper() {
        let mut px = vec![20u8; 100];
        px.extend(vec![230u8; 100]);
        let t = dot_threshold(&px, 20, 10).unwrap();
        assert!((20..230).contains(&t));
    }

    #[test]
    fn threshold_rejects_short_buffer() {
        let err = dot_threshold(&[0u8; 10], 4, 4).unwrap_err();
        assert!(matches!(err, DetectionError::GrayBuffer(4, 4)));
    }

    #[test]
    fn mostly_set_mask_is_inverted() {
        let mut mask = vec![255u8, 255, 255, 0];
        assert!(invert_if_mostly_set(&mut mask));
        assert_eq!(mask, vec![0, 0, 0, 255]);

        let mut sparse = vec![0u8, 0, 0, 255];
        assert!(!invert_if_mostly_set(&mut sparse));
        assert_eq!(sparse, vec![0, 0, 0, 255]);
    }

    #[test]
    fn centroids_far_apart_keep_the_weighted_one() {
        assert_eq!(settle_center((0.0, 0.0), (2.0, 0.0), 0.55), (2.0, 0.0));
        assert_eq!(settle_center((0.0, 0.0), (0.5, 0.5), 0.55), (0.25, 0.25));
    }

    #[test]
    fn components_outside_area_range_are_dropped() {
        // 3x3 block plus one isolated pixel in a 6x4 mask.
        let (w, h) = (6usize, 4usize);
        let mut mask = vec![0u8; w * h];
        for y in 0..3 {
            for x in 0..3 {
                mask[y * w + x] = 255;
            }
        }
        mask[3 * w + 5] = 255;
        let gray = vec![0u8; w * h];
        let cfg = DotConfig {
            min_component_pixels: 2,
            max_component_pixels: 20,
            ..DotConfig::default()
        };
        let dots = extract_components(&mask, &gray, w, h, &cfg);
        assert_eq!(dots.len(), 1);
        assert_eq!(dots[0].area, 9);
        assert!((dots[0].center.0 - 1.0).abs() < 1e-4);
        assert!((dots[0].center.1 - 1.0).abs() < 1e-4);
    }
}
