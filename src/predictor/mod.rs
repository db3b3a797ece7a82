//! High-level digit classification predictor.

pub mod digit_classifier;

pub use digit_classifier::{DigitClassifier, DigitClassifierBuilder, DigitPrediction};
