//! 8×8 digit images: synthetic generation, JSON loading and the
//! train/validation split.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use physquest_core::constants::*;
use physquest_core::error::SimError;

/// Stroke glyphs the synthetic generator perturbs, one per digit.
const GLYPHS: [[&str; DIGIT_SIDE]; DIGIT_CLASSES] = [
    ["..####..", ".#....#.", ".#....#.", ".#....#.", ".#....#.", ".#....#.", ".#....#.", "..####.."],
    ["...##...", "..###...", "...##...", "...##...", "...##...", "...##...", "...##...", "..####.."],
    ["..####..", ".#....#.", "......#.", ".....#..", "....#...", "...#....", "..#.....", ".######."],
    ["..####..", ".#....#.", "......#.", "...###..", "......#.", "......#.", ".#....#.", "..####.."],
    ["....##..", "...#.#..", "..#..#..", ".#...#..", ".######.", ".....#..", ".....#..", ".....#.."],
    [".######.", ".#......", ".#......", ".#####..", "......#.", "......#.", ".#....#.", "..####.."],
    ["..####..", ".#......", ".#......", ".#####..", ".#....#.", ".#....#.", ".#....#.", "..####.."],
    [".######.", "......#.", ".....#..", "....#...", "...#....", "...#....", "...#....", "...#...."],
    ["..####..", ".#....#.", ".#....#.", "..####..", ".#....#.", ".#....#.", ".#....#.", "..####.."],
    ["..####..", ".#....#.", ".#....#.", ".#....#.", "..#####.", "......#.", "......#.", "..####.."],
];

/// Stroke intensity range as a fraction of full scale.
const STROKE_MIN: f64 = 0.6;
const STROKE_MAX: f64 = 1.0;

/// Upper bound of the uniform background noise, as a fraction of full scale.
const NOISE_LEVEL: f64 = 0.25;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("malformed dataset: {0}")]
    Json(#[from] serde_json::Error),

    #[error("sample {index}: label {label} is not a digit")]
    InvalidLabel { index: usize, label: usize },

    #[error("sample {index}: pixel value {value} outside 0..=16")]
    PixelOutOfRange { index: usize, value: f64 },

    #[error("sample {index}: {source}")]
    Shape { index: usize, source: SimError },

    #[error(transparent)]
    Sim(#[from] SimError),
}

/// One image with pixels scaled to [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DigitSample {
    pub pixels: Vec<f64>,
    pub label: usize,
}

/// On-disk form: raw 0–16 intensities.
#[derive(Debug, Deserialize)]
struct RawDigit {
    pixels: Vec<f64>,
    label: usize,
}

#[derive(Debug, Clone, Default)]
pub struct DigitDataset {
    samples: Vec<DigitSample>,
}

impl DigitDataset {
    pub fn new(samples: Vec<DigitSample>) -> Result<Self, SimError> {
        for sample in &samples {
            if sample.pixels.len() != DIGIT_INPUT_SIZE {
                return Err(SimError::ShapeMismatch {
                    expected: DIGIT_INPUT_SIZE,
                    actual: sample.pixels.len(),
                });
            }
        }
        Ok(Self { samples })
    }

    /// Deterministic synthetic digits: every glyph shifted by up to one
    /// pixel, with jittered stroke intensity and background noise.
    pub fn synthetic(samples_per_class: usize, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let samples = (0..DIGIT_CLASSES)
            .flat_map(|label| std::iter::repeat(label).take(samples_per_class))
            .map(|label| DigitSample {
                pixels: render_glyph(label, &mut rng),
                label,
            })
            .collect();
        Self { samples }
    }

    /// Parse `[{ "pixels": [...64 values 0–16...], "label": 0–9 }, ...]`.
    pub fn from_json_str(json: &str) -> Result<Self, DatasetError> {
        let raw: Vec<RawDigit> = serde_json::from_str(json)?;
        let mut samples = Vec::with_capacity(raw.len());
        for (index, digit) in raw.into_iter().enumerate() {
            if digit.label >= DIGIT_CLASSES {
                return Err(DatasetError::InvalidLabel {
                    index,
                    label: digit.label,
                });
            }
            if digit.pixels.len() != DIGIT_INPUT_SIZE {
                return Err(DatasetError::Shape {
                    index,
                    source: SimError::ShapeMismatch {
                        expected: DIGIT_INPUT_SIZE,
                        actual: digit.pixels.len(),
                    },
                });
            }
            if let Some(&value) = digit
                .pixels
                .iter()
                .find(|v| !(0.0..=DIGIT_MAX_INTENSITY).contains(*v))
            {
                return Err(DatasetError::PixelOutOfRange { index, value });
            }
            samples.push(DigitSample {
                pixels: digit.pixels.iter().map(|v| v / DIGIT_MAX_INTENSITY).collect(),
                label: digit.label,
            });
        }
        if samples.is_empty() {
            return Err(SimError::EmptyDataset.into());
        }
        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[DigitSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Shuffle with `seed` and hold out `validation_fraction` of the samples.
    ///
    /// Returns `(train, validation)`.
    pub fn split(&self, validation_fraction: f64, seed: u64) -> (DigitDataset, DigitDataset) {
        let mut shuffled = self.samples.clone();
        shuffled.shuffle(&mut ChaCha8Rng::seed_from_u64(seed));
        let held_out = (shuffled.len() as f64 * validation_fraction.clamp(0.0, 1.0)).round() as usize;
        let validation = shuffled.split_off(shuffled.len() - held_out);
        (
            DigitDataset { samples: shuffled },
            DigitDataset {
                samples: validation,
            },
        )
    }

    /// Samples per label.
    pub fn class_counts(&self) -> [usize; DIGIT_CLASSES] {
        let mut counts = [0; DIGIT_CLASSES];
        for sample in &self.samples {
            counts[sample.label] += 1;
        }
        counts
    }
}

fn render_glyph<R: Rng>(label: usize, rng: &mut R) -> Vec<f64> {
    let glyph = &GLYPHS[label];
    let dx: i32 = rng.gen_range(-1..=1);
    let dy: i32 = rng.gen_range(-1..=1);
    let side = DIGIT_SIDE as i32;

    let mut pixels = Vec::with_capacity(DIGIT_INPUT_SIZE);
    for row in 0..side {
        for col in 0..side {
            let (src_row, src_col) = (row - dy, col - dx);
            let on = (0..side).contains(&src_row)
                && (0..side).contains(&src_col)
                && glyph[src_row as usize].as_bytes()[src_col as usize] == b'#';
            let stroke = if on {
                rng.gen_range(STROKE_MIN..STROKE_MAX) * DIGIT_MAX_INTENSITY
            } else {
                0.0
            };
            let noise = rng.gen_range(0.0..NOISE_LEVEL) * DIGIT_MAX_INTENSITY;
            // Quantize like the scanned originals, then scale.
            let level = (stroke + noise).min(DIGIT_MAX_INTENSITY).round();
            pixels.push(level / DIGIT_MAX_INTENSITY);
        }
    }
    pixels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_is_balanced_and_scaled() {
        let data = DigitDataset::synthetic(5, 1);
        assert_eq!(data.len(), 50);
        assert_eq!(data.class_counts(), [5; DIGIT_CLASSES]);
        for sample in data.samples() {
            assert_eq!(sample.pixels.len(), DIGIT_INPUT_SIZE);
            assert!(sample.pixels.iter().all(|p| (0.0..=1.0).contains(p)));
        }
    }

    #[test]
    fn synthetic_is_seeded() {
        let a = DigitDataset::synthetic(3, 9);
        let b = DigitDataset::synthetic(3, 9);
        let c = DigitDataset::synthetic(3, 10);
        assert_eq!(a.samples(), b.samples());
        assert_ne!(a.samples(), c.samples());
    }

    #[test]
    fn split_holds_out_a_fifth() {
        let data = DigitDataset::synthetic(10, 3);
        let (train, val) = data.split(DIGIT_VALIDATION_FRACTION, DIGIT_SPLIT_SEED);
        assert_eq!(train.len(), 80);
        assert_eq!(val.len(), 20);
    }

    #[test]
    fn loads_json_and_scales_pixels() {
        let pixels: Vec<String> = (0..64).map(|i| (i % 17).to_string()).collect();
        let json = format!(r#"[{{"pixels": [{}], "label": 3}}]"#, pixels.join(","));
        let data = DigitDataset::from_json_str(&json).unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data.samples()[0].label, 3);
        assert_eq!(data.samples()[0].pixels[16], 1.0);
    }

    #[test]
    fn rejects_bad_json_samples() {
        let short = r#"[{"pixels": [1, 2, 3], "label": 1}]"#;
        assert!(matches!(
            DigitDataset::from_json_str(short),
            Err(DatasetError::Shape { index: 0, .. })
        ));

        let zeros = vec!["0"; 64].join(",");
        let bad_label = format!(r#"[{{"pixels": [{zeros}], "label": 12}}]"#);
        assert!(matches!(
            DigitDataset::from_json_str(&bad_label),
            Err(DatasetError::InvalidLabel { label: 12, .. })
        ));

        assert!(matches!(
            DigitDataset::from_json_str("[]"),
            Err(DatasetError::Sim(SimError::EmptyDataset))
        ));
    }
}
