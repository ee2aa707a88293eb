//! Turn a free-hand canvas into classifier input.

use physquest_core::constants::{DIGIT_INPUT_SIZE, DIGIT_MAX_INTENSITY, DIGIT_SIDE};
use physquest_core::error::SimError;

/// Downsample a grayscale canvas (row-major, 0 = black ink, 255 = white
/// paper) to the 64 scaled intensities the network expects.
///
/// Each output pixel averages the ink in its block of the canvas, then is
/// quantized to 0–16 like the training images.
pub fn downsample_drawing(canvas: &[u8], width: usize, height: usize) -> Result<Vec<f64>, SimError> {
    if canvas.len() != width * height {
        return Err(SimError::ShapeMismatch {
            expected: width * height,
            actual: canvas.len(),
        });
    }
    if width < DIGIT_SIDE || height < DIGIT_SIDE {
        return Err(SimError::InvalidParameter {
            name: "canvas",
            value: width.min(height) as f64,
            reason: "must be at least 8 pixels on each side",
        });
    }

    let mut pixels = Vec::with_capacity(DIGIT_INPUT_SIZE);
    for row in 0..DIGIT_SIDE {
        let (y0, y1) = (row * height / DIGIT_SIDE, (row + 1) * height / DIGIT_SIDE);
        for col in 0..DIGIT_SIDE {
            let (x0, x1) = (col * width / DIGIT_SIDE, (col + 1) * width / DIGIT_SIDE);
            let mut ink = 0u64;
            for y in y0..y1 {
                let line = &canvas[y * width + x0..y * width + x1];
                ink += line.iter().map(|&p| u64::from(255 - p)).sum::<u64>();
            }
            let count = ((y1 - y0) * (x1 - x0)) as f64;
            let level = (ink as f64 / count / 255.0 * DIGIT_MAX_INTENSITY).round();
            pixels.push(level / DIGIT_MAX_INTENSITY);
        }
    }
    Ok(pixels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_canvas_is_all_zero() {
        let canvas = vec![255u8; 280 * 280];
        let pixels = downsample_drawing(&canvas, 280, 280).unwrap();
        assert_eq!(pixels.len(), DIGIT_INPUT_SIZE);
        assert!(pixels.iter().all(|&p| p == 0.0));
    }

    #[test]
    fn ink_lands_in_matching_block() {
        // 16x16 canvas: paint the top-left 2x2 block black.
        let mut canvas = vec![255u8; 16 * 16];
        for y in 0..2 {
            for x in 0..2 {
                canvas[y * 16 + x] = 0;
            }
        }
        let pixels = downsample_drawing(&canvas, 16, 16).unwrap();
        assert_eq!(pixels[0], 1.0);
        assert_eq!(pixels[1..].iter().sum::<f64>(), 0.0);
    }

    #[test]
    fn half_ink_quantizes_to_eight() {
        let mut canvas = vec![255u8; 16 * 16];
        canvas[0] = 0;
        canvas[1] = 0;
        let pixels = downsample_drawing(&canvas, 16, 16).unwrap();
        assert_eq!(pixels[0], 0.5);
    }

    #[test]
    fn rejects_tiny_or_mismatched_canvas() {
        assert!(downsample_drawing(&[0; 16], 4, 4).is_err());
        assert!(downsample_drawing(&[0; 10], 8, 8).is_err());
    }
}
