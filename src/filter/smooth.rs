//! Mask smoothing
//!
//! Each pass is a 3x3 box blur over the continuous mask with clamped
//! borders. Passes remove speckle noise from the classification without
//! ever changing the mask dimensions.

use crate::filter::MaskField;
use ndarray::Array2;

/// Apply `passes` rounds of 3x3 box blur to the mask
#[must_use]
pub fn smooth(mask: &MaskField, passes: u32) -> MaskField {
    let mut current = mask.clone();
    for _ in 0..passes {
        current = blur_once(&current);
    }
    current
}

fn blur_once(mask: &MaskField) -> MaskField {
    let (height, width) = mask.dim();
    if height == 0 || width == 0 {
        return mask.clone();
    }

    Array2::from_shape_fn((height, width), |(y, x)| {
        let mut sum = 0.0f32;
        let mut count = 0u32;
        for dy in -1i64..=1 {
            for dx in -1i64..=1 {
                let ny = y as i64 + dy;
                let nx = x as i64 + dx;
                if ny < 0 || nx < 0 || ny >= height as i64 || nx >= width as i64 {
                    continue;
                }
                sum += mask[[ny as usize, nx as usize]];
                count += 1;
            }
        }
        sum / count as f32
    })
}
