//! Background reference estimation
//!
//! The background color is estimated from the image border: all edge
//! pixels plus a small block at each corner. Samples are bucketed by
//! 4-bit-per-channel quantization and the dominant bucket is averaged in
//! full precision, which tolerates JPEG noise and light vignetting better
//! than a single corner probe.

use image::RgbaImage;

/// Side length of the corner blocks included in the sample set
const CORNER_BLOCK: u32 = 4;

/// Per-channel quantization shift for bucketing (4 bits kept)
const BUCKET_SHIFT: u8 = 4;

/// Estimated background color for a removal run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundReference {
    /// Reference color in full precision
    pub color: [f32; 3],
    /// Fraction of border samples that fell into the dominant bucket
    pub confidence: f32,
}

impl BackgroundReference {
    /// Reference color rounded to 8-bit channels (for metadata/reporting)
    #[must_use]
    pub fn color_u8(&self) -> [u8; 3] {
        [
            self.color[0].round().clamp(0.0, 255.0) as u8,
            self.color[1].round().clamp(0.0, 255.0) as u8,
            self.color[2].round().clamp(0.0, 255.0) as u8,
        ]
    }
}

fn bucket_key(pixel: &[u8; 3]) -> u16 {
    let r = u16::from(pixel[0] >> BUCKET_SHIFT);
    let g = u16::from(pixel[1] >> BUCKET_SHIFT);
    let b = u16::from(pixel[2] >> BUCKET_SHIFT);
    (r << 8) | (g << 4) | b
}

/// Estimate the background reference color from border and corner samples
///
/// Fully transparent border pixels are skipped; if every border pixel is
/// transparent the estimate falls back to the first pixel's color, which
/// keeps the already-transparent round-trip well-defined.
#[must_use]
pub fn estimate_background(image: &RgbaImage) -> BackgroundReference {
    let (width, height) = image.dimensions();

    let mut samples: Vec<[u8; 3]> = Vec::new();
    let mut push = |x: u32, y: u32| {
        let p = image.get_pixel(x, y);
        if p[3] > 0 {
            samples.push([p[0], p[1], p[2]]);
        }
    };

    // Border ring
    for x in 0..width {
        push(x, 0);
        if height > 1 {
            push(x, height - 1);
        }
    }
    for y in 1..height.saturating_sub(1) {
        push(0, y);
        if width > 1 {
            push(width - 1, y);
        }
    }

    // Corner blocks, weighted on top of the ring
    let bw = CORNER_BLOCK.min(width);
    let bh = CORNER_BLOCK.min(height);
    for y in 0..bh {
        for x in 0..bw {
            push(x, y);
            push(width - 1 - x, y);
            push(x, height - 1 - y);
            push(width - 1 - x, height - 1 - y);
        }
    }

    if samples.is_empty() {
        let p = image.get_pixel(0, 0);
        return BackgroundReference {
            color: [f32::from(p[0]), f32::from(p[1]), f32::from(p[2])],
            confidence: 0.0,
        };
    }

    // Dominant quantization bucket wins; average its members exactly
    let mut counts: std::collections::HashMap<u16, u32> = std::collections::HashMap::new();
    for s in &samples {
        *counts.entry(bucket_key(s)).or_insert(0) += 1;
    }
    let (&dominant, &dominant_count) = counts
        .iter()
        .max_by_key(|(_, &count)| count)
        .unwrap_or((&0, &0));

    let mut sum = [0.0f64; 3];
    let mut n = 0u32;
    for s in &samples {
        if bucket_key(s) == dominant {
            sum[0] += f64::from(s[0]);
            sum[1] += f64::from(s[1]);
            sum[2] += f64::from(s[2]);
            n += 1;
        }
    }
    let n = n.max(1);

    BackgroundReference {
        color: [
            (sum[0] / f64::from(n)) as f32,
            (sum[1] / f64::from(n)) as f32,
            (sum[2] / f64::from(n)) as f32,
        ],
        confidence: dominant_count as f32 / samples.len() as f32,
    }
}
