//! Digit classifier quest: data, network, training loop and canvas input.

pub mod dataset;
pub mod drawing;
pub mod network;
pub mod training;

pub use dataset::{DatasetError, DigitDataset, DigitSample};
pub use drawing::downsample_drawing;
pub use network::Perceptron;
pub use training::{DigitTraining, TrainingParams};
