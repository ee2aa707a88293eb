//! Digit classifier training run (quest 7). One engine step trains one epoch.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use physquest_core::constants::*;
use physquest_core::enums::{QuestId, StepOutcome};
use physquest_core::error::SimError;
use physquest_core::state::{EpochMetrics, TrainingFrame, TrainingSeries};
use physquest_core::types::{SimTime, Verdict};

use super::dataset::DigitDataset;
use super::network::Perceptron;
use crate::engine::Simulation;

/// Hyperparameters chosen by the player, plus the init seed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingParams {
    pub learning_rate: f64,
    pub hidden: usize,
    pub epochs: usize,
    pub init_scale: f64,
    pub seed: u64,
}

impl Default for TrainingParams {
    fn default() -> Self {
        Self {
            learning_rate: DIGIT_DEFAULT_LEARNING_RATE,
            hidden: DIGIT_DEFAULT_HIDDEN,
            epochs: DIGIT_DEFAULT_EPOCHS,
            init_scale: DIGIT_INIT_SCALE,
            seed: DIGIT_SPLIT_SEED,
        }
    }
}

impl TrainingParams {
    pub fn validate(&self) -> Result<(), SimError> {
        SimError::check_positive("learning_rate", self.learning_rate)?;
        SimError::check_finite("init_scale", self.init_scale)?;
        if self.hidden == 0 {
            return Err(SimError::InvalidParameter {
                name: "hidden",
                value: 0.0,
                reason: "must be at least 1",
            });
        }
        if self.epochs == 0 {
            return Err(SimError::InvalidParameter {
                name: "epochs",
                value: 0.0,
                reason: "must be at least 1",
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct DigitTraining {
    params: TrainingParams,
    train: DigitDataset,
    validation: DigitDataset,
    network: Perceptron,
    time: SimTime,
    series: TrainingSeries,
}

impl DigitTraining {
    /// Split `dataset` 80/20 and initialise a fresh network.
    pub fn new(params: TrainingParams, dataset: &DigitDataset) -> Result<Self, SimError> {
        params.validate()?;
        let (train, validation) = dataset.split(DIGIT_VALIDATION_FRACTION, DIGIT_SPLIT_SEED);
        if train.is_empty() || validation.is_empty() {
            return Err(SimError::EmptyDataset);
        }
        let network = Self::init_network(&params)?;
        tracing::debug!(
            train = train.len(),
            validation = validation.len(),
            hidden = params.hidden,
            "digit training prepared"
        );
        Ok(Self {
            params,
            train,
            validation,
            network,
            time: SimTime::default(),
            series: TrainingSeries::default(),
        })
    }

    fn init_network(params: &TrainingParams) -> Result<Perceptron, SimError> {
        let mut rng = ChaCha8Rng::seed_from_u64(params.seed);
        Perceptron::for_digits(params.hidden, params.init_scale, &mut rng)
    }

    pub fn params(&self) -> &TrainingParams {
        &self.params
    }

    pub fn network(&self) -> &Perceptron {
        &self.network
    }

    pub fn series(&self) -> &TrainingSeries {
        &self.series
    }

    pub fn train_set(&self) -> &DigitDataset {
        &self.train
    }

    pub fn validation_set(&self) -> &DigitDataset {
        &self.validation
    }

    /// Classify one 64-value image with the current weights.
    pub fn predict(&self, pixels: &[f64]) -> Result<usize, SimError> {
        self.network.predict(pixels)
    }

    fn run_epoch(&mut self) -> Result<EpochMetrics, SimError> {
        let (train_loss, train_accuracy) =
            self.network.train_epoch(&self.train, self.params.learning_rate)?;
        let (val_loss, val_accuracy) = self.network.evaluate(&self.validation)?;
        Ok(EpochMetrics {
            train_loss,
            val_loss,
            train_accuracy,
            val_accuracy,
        })
    }
}

impl Simulation for DigitTraining {
    type Frame = TrainingFrame;

    fn quest(&self) -> QuestId {
        QuestId::DigitClassifier
    }

    fn dt(&self) -> f64 {
        DIGIT_EPOCH_FRAME_SECS
    }

    fn time(&self) -> SimTime {
        self.time
    }

    fn reset(&mut self) {
        // Parameters were validated in `new`, so re-initialising cannot fail.
        if let Ok(network) = Self::init_network(&self.params) {
            self.network = network;
        }
        self.time = SimTime::default();
        self.series = TrainingSeries::default();
    }

    fn step(&mut self) -> StepOutcome {
        if self.series.epochs() >= self.params.epochs {
            return StepOutcome::Finished;
        }
        let metrics = match self.run_epoch() {
            Ok(metrics) => metrics,
            Err(err) => {
                tracing::warn!(%err, "training epoch failed");
                return StepOutcome::Finished;
            }
        };
        self.series.push(metrics);
        self.time.advance(DIGIT_EPOCH_FRAME_SECS);
        tracing::debug!(
            epoch = self.series.epochs(),
            train_loss = metrics.train_loss,
            val_accuracy = metrics.val_accuracy,
            "epoch complete"
        );

        if self.series.epochs() >= self.params.epochs {
            StepOutcome::Finished
        } else {
            StepOutcome::Continue
        }
    }

    fn frame(&self) -> TrainingFrame {
        TrainingFrame {
            time: self.time,
            epochs_planned: self.params.epochs,
            series: self.series.clone(),
        }
    }

    fn verdict(&self) -> Verdict {
        match self.series.val_accuracies.last() {
            None => Verdict::failure("No validation accuracy recorded."),
            Some(&accuracy) if accuracy >= DIGIT_SUCCESS_ACCURACY => {
                Verdict::success(format!("Success! Validation Accuracy: {:.2}%", accuracy * 100.0))
            }
            Some(&accuracy) => Verdict::failure(format!(
                "Validation Accuracy: {:.2}%. Try adjusting hyperparameters.",
                accuracy * 100.0
            )),
        }
    }
}
