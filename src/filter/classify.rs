//! Per-pixel background/foreground classification
//!
//! Classification works on a color-distance field: the Euclidean RGB
//! distance of every pixel to the background reference. A pixel whose
//! distance is at or below the cutoff is background (mask `0.0`), all
//! others are foreground (mask `1.0`). The cutoff is either the global
//! `threshold` (fixed mode) or scaled per pixel from neighborhood
//! statistics (adaptive mode).

use crate::config::MAX_COLOR_DISTANCE;
use crate::filter::background::BackgroundReference;
use crate::filter::MaskField;
use image::RgbaImage;
use ndarray::Array2;

/// Half-width of the adaptive neighborhood window (15x15 pixels)
const ADAPTIVE_WINDOW_RADIUS: usize = 7;

/// Adaptive cutoff scale bounds relative to the global threshold
const ADAPTIVE_FACTOR_MIN: f32 = 0.5;
const ADAPTIVE_FACTOR_MAX: f32 = 1.5;

/// Compute the color-distance field of an image against a reference color
///
/// Shape is `(height, width)`; values are in `[0, MAX_COLOR_DISTANCE]`.
#[must_use]
pub fn distance_field(image: &RgbaImage, reference: &BackgroundReference) -> Array2<f32> {
    let (width, height) = image.dimensions();
    let [rr, rg, rb] = reference.color;

    Array2::from_shape_fn((height as usize, width as usize), |(y, x)| {
        let p = image.get_pixel(x as u32, y as u32);
        let dr = f32::from(p[0]) - rr;
        let dg = f32::from(p[1]) - rg;
        let db = f32::from(p[2]) - rb;
        (dr * dr + dg * dg + db * db).sqrt()
    })
}

/// Classify against one global cutoff
///
/// `threshold = 0.0` keeps every pixel that differs from the reference at
/// all: only exact color matches are classified background.
#[must_use]
pub fn classify_fixed(distances: &Array2<f32>, threshold: f32) -> MaskField {
    distances.mapv(|d| if d <= threshold { 0.0 } else { 1.0 })
}

/// Classify with a per-pixel cutoff derived from neighborhood statistics
///
/// The global threshold is scaled by how background-like the pixel's
/// neighborhood is: flat regions (local mean distance below the global
/// mean) get a looser cutoff that absorbs noise, busy regions get a
/// stricter one that protects the subject. The scale is clamped to
/// `[0.5, 1.5]`, so `threshold = 0.0` still admits only exact matches.
#[must_use]
pub fn classify_adaptive(distances: &Array2<f32>, threshold: f32) -> MaskField {
    let (height, width) = distances.dim();
    if height == 0 || width == 0 {
        return MaskField::zeros((height, width));
    }

    let integral = integral_image(distances);
    let global_mean = distances.mean().unwrap_or(0.0);

    Array2::from_shape_fn((height, width), |(y, x)| {
        let local_mean = window_mean(&integral, y, x, height, width);
        let factor = (1.0 + (global_mean - local_mean) / MAX_COLOR_DISTANCE)
            .clamp(ADAPTIVE_FACTOR_MIN, ADAPTIVE_FACTOR_MAX);
        let cutoff = threshold * factor;
        if distances[[y, x]] <= cutoff {
            0.0
        } else {
            1.0
        }
    })
}

/// Summed-area table with a one-cell zero border, `f64` accumulation
fn integral_image(values: &Array2<f32>) -> Array2<f64> {
    let (height, width) = values.dim();
    let mut integral = Array2::<f64>::zeros((height + 1, width + 1));
    for y in 0..height {
        let mut row_sum = 0.0f64;
        for x in 0..width {
            row_sum += f64::from(values[[y, x]]);
            integral[[y + 1, x + 1]] = integral[[y, x + 1]] + row_sum;
        }
    }
    integral
}

fn window_mean(integral: &Array2<f64>, y: usize, x: usize, height: usize, width: usize) -> f32 {
    let y0 = y.saturating_sub(ADAPTIVE_WINDOW_RADIUS);
    let x0 = x.saturating_sub(ADAPTIVE_WINDOW_RADIUS);
    let y1 = (y + ADAPTIVE_WINDOW_RADIUS + 1).min(height);
    let x1 = (x + ADAPTIVE_WINDOW_RADIUS + 1).min(width);

    let sum =
        integral[[y1, x1]] - integral[[y0, x1]] - integral[[y1, x0]] + integral[[y0, x0]];
    let count = ((y1 - y0) * (x1 - x0)).max(1);
    (sum / count as f64) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn white_reference() -> BackgroundReference {
        BackgroundReference {
            color: [255.0, 255.0, 255.0],
            confidence: 1.0,
        }
    }

    #[test]
    fn test_distance_field_values() {
        let mut image = RgbaImage::from_pixel(2, 1, Rgba([255, 255, 255, 255]));
        image.put_pixel(1, 0, Rgba([0, 0, 255, 255]));

        let field = distance_field(&image, &white_reference());
        assert_eq!(field.dim(), (1, 2));
        assert_eq!(field[[0, 0]], 0.0);
        // White to blue: sqrt(255^2 + 255^2 + 0) = 360.62
        assert!((field[[0, 1]] - 360.62).abs() < 0.1);
    }

    #[test]
    fn test_fixed_classification() {
        let distances =
            Array2::from_shape_vec((1, 4), vec![0.0, 10.0, 30.0, 100.0]).unwrap();

        let mask = classify_fixed(&distances, 30.0);
        assert_eq!(mask[[0, 0]], 0.0);
        assert_eq!(mask[[0, 1]], 0.0);
        assert_eq!(mask[[0, 2]], 0.0); // Cutoff is inclusive
        assert_eq!(mask[[0, 3]], 1.0);
    }

    #[test]
    fn test_zero_threshold_keeps_everything_but_exact_matches() {
        let distances = Array2::from_shape_vec((1, 3), vec![0.0, 0.1, 200.0]).unwrap();

        for mask in [
            classify_fixed(&distances, 0.0),
            classify_adaptive(&distances, 0.0),
        ] {
            assert_eq!(mask[[0, 0]], 0.0); // Exact match is background
            assert_eq!(mask[[0, 1]], 1.0);
            assert_eq!(mask[[0, 2]], 1.0);
        }
    }

    #[test]
    fn test_larger_threshold_more_background() {
        let distances =
            Array2::from_shape_vec((1, 4), vec![5.0, 20.0, 60.0, 300.0]).unwrap();

        let low = classify_fixed(&distances, 10.0);
        let high = classify_fixed(&distances, 100.0);

        let bg = |m: &MaskField| m.iter().filter(|&&v| v == 0.0).count();
        assert!(bg(&high) > bg(&low));
    }

    #[test]
    fn test_adaptive_loosens_flat_regions() {
        // A flat low-distance region (background noise) next to a busy
        // high-distance region (subject). The noisy background pixel at
        // distance 32 sits just above the global threshold of 30; adaptive
        // mode should still absorb it because its neighborhood is flat.
        let mut values = vec![4.0f32; 32 * 32];
        for y in 0..32 {
            for x in 16..32 {
                values[y * 32 + x] = 300.0;
            }
        }
        values[5 * 32 + 2] = 32.0;
        let distances = Array2::from_shape_vec((32, 32), values).unwrap();

        let fixed = classify_fixed(&distances, 30.0);
        let adaptive = classify_adaptive(&distances, 30.0);

        assert_eq!(fixed[[5, 2]], 1.0); // Fixed mode keeps the speck
        assert_eq!(adaptive[[5, 2]], 0.0); // Adaptive absorbs it
        assert_eq!(adaptive[[5, 20]], 1.0); // Subject region untouched
    }

    #[test]
    fn test_adaptive_uniform_image() {
        let distances = Array2::zeros((16, 16));
        let mask = classify_adaptive(&distances, 30.0);
        assert!(mask.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_integral_image_window_mean() {
        let values = Array2::from_elem((20, 20), 2.0f32);
        let integral = integral_image(&values);
        let mean = window_mean(&integral, 10, 10, 20, 20);
        assert!((mean - 2.0).abs() < 1e-5);

        // Corner windows are clipped but still average correctly
        let mean = window_mean(&integral, 0, 0, 20, 20);
        assert!((mean - 2.0).abs() < 1e-5);
    }
}
