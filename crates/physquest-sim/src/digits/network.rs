//! Two-layer perceptron: dense → ReLU → dense → softmax.
//!
//! Weights are flat row-major buffers (`w1[i * hidden + j]` connects input
//! `i` to hidden unit `j`). Training is plain full-batch gradient descent on
//! mean cross-entropy.

use rand::Rng;
use serde::{Deserialize, Serialize};

use physquest_core::constants::{DIGIT_CLASSES, DIGIT_INPUT_SIZE, DIGIT_LOG_EPSILON};
use physquest_core::error::SimError;

use super::dataset::DigitDataset;

/// Standard normal sample (Box-Muller).
fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    // 1 - [0, 1) keeps the log argument strictly positive.
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
}

/// Intermediate values of one forward pass, kept for backprop.
#[derive(Debug, Clone)]
pub struct Activations {
    pub hidden_pre: Vec<f64>,
    pub hidden: Vec<f64>,
    pub probabilities: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Perceptron {
    inputs: usize,
    hidden: usize,
    outputs: usize,
    w1: Vec<f64>,
    b1: Vec<f64>,
    w2: Vec<f64>,
    b2: Vec<f64>,
}

impl Perceptron {
    /// Digit-sized network (64 inputs, 10 classes) with `hidden` units.
    pub fn for_digits<R: Rng + ?Sized>(
        hidden: usize,
        init_scale: f64,
        rng: &mut R,
    ) -> Result<Self, SimError> {
        Self::new(DIGIT_INPUT_SIZE, hidden, DIGIT_CLASSES, init_scale, rng)
    }

    /// Gaussian weights scaled by `init_scale`, zero biases.
    pub fn new<R: Rng + ?Sized>(
        inputs: usize,
        hidden: usize,
        outputs: usize,
        init_scale: f64,
        rng: &mut R,
    ) -> Result<Self, SimError> {
        for (name, size) in [("inputs", inputs), ("hidden", hidden), ("outputs", outputs)] {
            if size == 0 {
                return Err(SimError::InvalidParameter {
                    name,
                    value: 0.0,
                    reason: "layer must have at least one unit",
                });
            }
        }
        SimError::check_finite("init_scale", init_scale)?;

        let w1: Vec<f64> = (0..inputs * hidden)
            .map(|_| standard_normal(&mut *rng) * init_scale)
            .collect();
        let w2: Vec<f64> = (0..hidden * outputs)
            .map(|_| standard_normal(&mut *rng) * init_scale)
            .collect();
        Ok(Self {
            inputs,
            hidden,
            outputs,
            w1,
            b1: vec![0.0; hidden],
            w2,
            b2: vec![0.0; outputs],
        })
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden
    }

    fn check_dataset(&self, data: &DigitDataset) -> Result<(), SimError> {
        if data.is_empty() {
            return Err(SimError::EmptyDataset);
        }
        match data.samples().iter().find(|s| s.pixels.len() != self.inputs) {
            Some(sample) => Err(SimError::ShapeMismatch {
                expected: self.inputs,
                actual: sample.pixels.len(),
            }),
            None => Ok(()),
        }
    }

    pub fn forward(&self, x: &[f64]) -> Activations {
        let mut hidden_pre = self.b1.clone();
        for (i, &xi) in x.iter().enumerate().take(self.inputs) {
            if xi == 0.0 {
                continue;
            }
            let row = &self.w1[i * self.hidden..(i + 1) * self.hidden];
            for (z, w) in hidden_pre.iter_mut().zip(row) {
                *z += xi * w;
            }
        }
        let hidden: Vec<f64> = hidden_pre.iter().map(|z| z.max(0.0)).collect();

        let mut logits = self.b2.clone();
        for (j, &aj) in hidden.iter().enumerate() {
            if aj == 0.0 {
                continue;
            }
            let row = &self.w2[j * self.outputs..(j + 1) * self.outputs];
            for (z, w) in logits.iter_mut().zip(row) {
                *z += aj * w;
            }
        }

        Activations {
            hidden_pre,
            hidden,
            probabilities: softmax(&logits),
        }
    }

    /// Class probabilities for one image.
    pub fn predict_proba(&self, x: &[f64]) -> Result<Vec<f64>, SimError> {
        if x.len() != self.inputs {
            return Err(SimError::ShapeMismatch {
                expected: self.inputs,
                actual: x.len(),
            });
        }
        Ok(self.forward(x).probabilities)
    }

    /// Most likely class for one image.
    pub fn predict(&self, x: &[f64]) -> Result<usize, SimError> {
        Ok(argmax(&self.predict_proba(x)?))
    }

    /// Mean cross-entropy and accuracy over `data`.
    pub fn evaluate(&self, data: &DigitDataset) -> Result<(f64, f64), SimError> {
        self.check_dataset(data)?;
        let mut loss = 0.0;
        let mut correct = 0usize;
        for sample in data.samples() {
            let probs = self.forward(&sample.pixels).probabilities;
            loss -= (probs[sample.label] + DIGIT_LOG_EPSILON).ln();
            if argmax(&probs) == sample.label {
                correct += 1;
            }
        }
        let n = data.len() as f64;
        Ok((loss / n, correct as f64 / n))
    }

    /// One full-batch gradient descent step.
    ///
    /// Returns the mean loss and accuracy measured before the update.
    pub fn train_epoch(
        &mut self,
        data: &DigitDataset,
        learning_rate: f64,
    ) -> Result<(f64, f64), SimError> {
        self.check_dataset(data)?;
        let (h, k) = (self.hidden, self.outputs);
        let mut grad_w1 = vec![0.0; self.w1.len()];
        let mut grad_b1 = vec![0.0; h];
        let mut grad_w2 = vec![0.0; self.w2.len()];
        let mut grad_b2 = vec![0.0; k];

        let m = data.len() as f64;
        let mut loss = 0.0;
        let mut correct = 0usize;
        let mut delta_out = vec![0.0; k];
        let mut delta_hidden = vec![0.0; h];

        for sample in data.samples() {
            let act = self.forward(&sample.pixels);
            loss -= (act.probabilities[sample.label] + DIGIT_LOG_EPSILON).ln();
            if argmax(&act.probabilities) == sample.label {
                correct += 1;
            }

            // d(loss)/d(logits) for softmax + cross-entropy.
            for (c, d) in delta_out.iter_mut().enumerate() {
                let target = if c == sample.label { 1.0 } else { 0.0 };
                *d = (act.probabilities[c] - target) / m;
            }
            for (gb, d) in grad_b2.iter_mut().zip(&delta_out) {
                *gb += d;
            }
            for (j, &aj) in act.hidden.iter().enumerate() {
                let w_row = &self.w2[j * k..(j + 1) * k];
                let g_row = &mut grad_w2[j * k..(j + 1) * k];
                let mut back = 0.0;
                for c in 0..k {
                    g_row[c] += aj * delta_out[c];
                    back += w_row[c] * delta_out[c];
                }
                delta_hidden[j] = if act.hidden_pre[j] > 0.0 { back } else { 0.0 };
            }
            for (gb, d) in grad_b1.iter_mut().zip(&delta_hidden) {
                *gb += d;
            }
            for (i, &xi) in sample.pixels.iter().enumerate() {
                if xi == 0.0 {
                    continue;
                }
                let g_row = &mut grad_w1[i * h..(i + 1) * h];
                for (g, d) in g_row.iter_mut().zip(&delta_hidden) {
                    *g += xi * d;
                }
            }
        }

        descend(&mut self.w1, &grad_w1, learning_rate);
        descend(&mut self.b1, &grad_b1, learning_rate);
        descend(&mut self.w2, &grad_w2, learning_rate);
        descend(&mut self.b2, &grad_b2, learning_rate);

        Ok((loss / m, correct as f64 / m))
    }
}

fn descend(params: &mut [f64], grads: &[f64], learning_rate: f64) {
    for (p, g) in params.iter_mut().zip(grads) {
        *p -= learning_rate * g;
    }
}

/// Numerically stable softmax.
pub fn softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|z| (z - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Index of the largest value (first on ties).
pub fn argmax(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |best, (i, &v)| if v > best.1 { (i, v) } else { best })
        .0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn softmax_sums_to_one() {
        let p = softmax(&[1000.0, 1000.0, -1000.0]);
        assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!((p[0] - 0.5).abs() < 1e-12);
        assert_eq!(argmax(&p), 0);
    }

    #[test]
    fn gaussian_init_has_unit_scale() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let samples: Vec<f64> = (0..20_000).map(|_| standard_normal(&mut rng)).collect();
        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        let var = samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / samples.len() as f64;
        assert!(mean.abs() < 0.05);
        assert!((var - 1.0).abs() < 0.05);
    }

    #[test]
    fn rejects_empty_hidden_layer() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(Perceptron::for_digits(0, 0.01, &mut rng).is_err());
    }

    #[test]
    fn evaluate_checks_sample_width() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let narrow = Perceptron::new(32, 8, DIGIT_CLASSES, 0.01, &mut rng).unwrap();
        let data = DigitDataset::synthetic(2, 3);
        assert_eq!(
            narrow.evaluate(&data),
            Err(SimError::ShapeMismatch {
                expected: 32,
                actual: DIGIT_INPUT_SIZE
            })
        );
        let net = Perceptron::for_digits(8, 0.01, &mut rng).unwrap();
        assert!(net.evaluate(&data).is_ok());
    }

    #[test]
    fn predict_checks_input_shape() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let net = Perceptron::for_digits(8, 0.01, &mut rng).unwrap();
        assert_eq!(
            net.predict(&[0.0; 10]),
            Err(SimError::ShapeMismatch {
                expected: 64,
                actual: 10
            })
        );
        assert!(net.predict(&[0.5; 64]).unwrap() < DIGIT_CLASSES);
    }

    #[test]
    fn gradient_step_reduces_loss_on_tiny_problem() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let data = DigitDataset::synthetic(4, 3);
        let mut net = Perceptron::for_digits(16, 0.1, &mut rng).unwrap();
        let (before, _) = net.evaluate(&data).unwrap();
        for _ in 0..20 {
            net.train_epoch(&data, 0.1).unwrap();
        }
        let (after, _) = net.evaluate(&data).unwrap();
        assert!(after < before);
    }
}
