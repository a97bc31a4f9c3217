//! Boundary feathering
//!
//! Feathering converts the hard foreground/background cut into a linear
//! alpha ramp of the requested width. The mask is first binarized at 0.5,
//! then a signed distance to the boundary is approximated with a two-pass
//! chamfer transform (weights 1 / sqrt(2)), and alpha ramps linearly from
//! 0 at `radius` pixels outside the boundary to 1 at `radius` pixels
//! inside it. A radius of 0 returns the binary cut unchanged.

use crate::filter::MaskField;
use ndarray::Array2;

const CHAMFER_STRAIGHT: f32 = 1.0;
const CHAMFER_DIAGONAL: f32 = std::f32::consts::SQRT_2;

/// Feather the mask boundary over `radius` pixels
#[must_use]
pub fn feather(mask: &MaskField, radius: u32) -> MaskField {
    let binary = mask.mapv(|v| v >= 0.5);
    let (height, width) = binary.dim();

    if radius == 0 || height == 0 || width == 0 {
        return binary.mapv(|fg| if fg { 1.0 } else { 0.0 });
    }

    // Degenerate masks have no boundary to feather
    let fg_count = binary.iter().filter(|&&fg| fg).count();
    if fg_count == 0 {
        return MaskField::zeros((height, width));
    }
    if fg_count == height * width {
        return MaskField::from_elem((height, width), 1.0);
    }

    // Distance of every pixel to the nearest background pixel, and to the
    // nearest foreground pixel; their difference is a signed depth.
    let to_background = chamfer_distance(&binary, false);
    let to_foreground = chamfer_distance(&binary, true);

    let radius = radius as f32;
    Array2::from_shape_fn((height, width), |(y, x)| {
        let signed = to_background[[y, x]] - to_foreground[[y, x]];
        ((signed + radius) / (2.0 * radius)).clamp(0.0, 1.0)
    })
}

/// Two-pass chamfer distance to the nearest pixel where `binary == target`
fn chamfer_distance(binary: &Array2<bool>, target: bool) -> Array2<f32> {
    let (height, width) = binary.dim();
    let infinity = (height + width) as f32 * 2.0;

    let mut dist = Array2::from_shape_fn((height, width), |(y, x)| {
        if binary[[y, x]] == target {
            0.0
        } else {
            infinity
        }
    });

    let relax = |dist: &mut Array2<f32>, y: usize, x: usize, ny: i64, nx: i64, weight: f32| {
        if ny < 0 || nx < 0 || ny >= height as i64 || nx >= width as i64 {
            return;
        }
        let candidate = dist[[ny as usize, nx as usize]] + weight;
        if candidate < dist[[y, x]] {
            dist[[y, x]] = candidate;
        }
    };

    // Forward pass: top-left to bottom-right
    for y in 0..height {
        for x in 0..width {
            let (yi, xi) = (y as i64, x as i64);
            relax(&mut dist, y, x, yi, xi - 1, CHAMFER_STRAIGHT);
            relax(&mut dist, y, x, yi - 1, xi, CHAMFER_STRAIGHT);
            relax(&mut dist, y, x, yi - 1, xi - 1, CHAMFER_DIAGONAL);
            relax(&mut dist, y, x, yi - 1, xi + 1, CHAMFER_DIAGONAL);
        }
    }

    // Backward pass: bottom-right to top-left
    for y in (0..height).rev() {
        for x in (0..width).rev() {
            let (yi, xi) = (y as i64, x as i64);
            relax(&mut dist, y, x, yi, xi + 1, CHAMFER_STRAIGHT);
            relax(&mut dist, y, x, yi + 1, xi, CHAMFER_STRAIGHT);
            relax(&mut dist, y, x, yi + 1, xi + 1, CHAMFER_DIAGONAL);
            relax(&mut dist, y, x, yi + 1, xi - 1, CHAMFER_DIAGONAL);
        }
    }

    dist
}

#[cfg(test)]
mod tests {
    use super::*;

    fn half_split_mask(size: usize) -> MaskField {
        // Left half background, right half foreground
        MaskField::from_shape_fn((size, size), |(_, x)| if x >= size / 2 { 1.0 } else { 0.0 })
    }

    #[test]
    fn test_zero_radius_is_binary() {
        let mask = half_split_mask(10);
        let feathered = feather(&mask, 0);
        assert!(feathered.iter().all(|&v| v == 0.0 || v == 1.0));
    }

    #[test]
    fn test_positive_radius_monotone_ramp() {
        let mask = half_split_mask(20);
        let feathered = feather(&mask, 3);

        // Along a row crossing the boundary the alpha never decreases
        for x in 1..20 {
            assert!(
                feathered[[10, x]] >= feathered[[10, x - 1]],
                "alpha dipped at x={x}"
            );
        }

        // Intermediate values exist inside the ramp
        assert!(feathered.iter().any(|&v| v > 0.0 && v < 1.0));

        // Far from the boundary the mask saturates
        assert_eq!(feathered[[10, 0]], 0.0);
        assert_eq!(feathered[[10, 19]], 1.0);
    }

    #[test]
    fn test_ramp_width_tracks_radius() {
        let mask = half_split_mask(40);
        let narrow = feather(&mask, 2);
        let wide = feather(&mask, 6);

        let partial = |m: &MaskField| {
            m.row(20)
                .iter()
                .filter(|&&v| v > 0.0 && v < 1.0)
                .count()
        };
        assert!(partial(&wide) > partial(&narrow));
    }

    #[test]
    fn test_all_background_stays_empty() {
        let mask = MaskField::zeros((8, 8));
        let feathered = feather(&mask, 4);
        assert!(feathered.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_all_foreground_stays_full() {
        let mask = MaskField::from_elem((8, 8), 1.0);
        let feathered = feather(&mask, 4);
        assert!(feathered.iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_chamfer_distances() {
        let mut binary = Array2::from_elem((5, 5), false);
        binary[[2, 2]] = true;
        let dist = chamfer_distance(&binary, true);

        assert_eq!(dist[[2, 2]], 0.0);
        assert_eq!(dist[[2, 3]], 1.0);
        assert!((dist[[3, 3]] - std::f32::consts::SQRT_2).abs() < 1e-6);
        assert_eq!(dist[[2, 4]], 2.0);
    }

    #[test]
    fn test_continuous_input_binarized_first() {
        // Values straddling 0.5 collapse onto the cut before feathering
        let mut mask = MaskField::zeros((6, 6));
        mask[[2, 2]] = 0.6;
        mask[[2, 3]] = 0.4;

        let feathered = feather(&mask, 0);
        assert_eq!(feathered[[2, 2]], 1.0);
        assert_eq!(feathered[[2, 3]], 0.0);
    }
}
