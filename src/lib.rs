//! # Digit Classifier
//!
//! A Rust library for classifying handwritten digits (0-9) in images using
//! ONNX models.
//!
//! ## Pipeline
//!
//! One strictly forward pass, no feedback and no retries:
//!
//! 1. **Load** - read an image file and convert it to grayscale
//! 2. **Preprocess** - resize to the model input size (28x28 by default,
//!    linear interpolation) and normalize intensities into [0, 1] as an
//!    `(N, 1, H, W)` float32 batch
//! 3. **Infer** - score the batch with an ONNX Runtime session
//! 4. **Extract** - argmax (or top-k) over the 10 raw class scores
//!
//! ## Modules
//!
//! * [`core`] - error handling, configuration, the inference engine, and the
//!   backend capability trait
//! * [`processors`] - pixel normalization and top-k extraction
//! * [`predictor`] - the digit classifier and its builder
//! * [`utils`] - image loading helpers
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use digit_classifier::prelude::*;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let classifier = DigitClassifierBuilder::new().build(Path::new("model/mnist.onnx"))?;
//! let prediction = classifier.classify_path(Path::new("data/zero.png"))?;
//! if let Some((digit, confidence)) = prediction.best() {
//!     println!("Predicted Digit: {digit}");
//!     println!("Confidence: {confidence}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! The confidence is the model's raw score for the winning class; it is only
//! a probability if the model's final layer applies softmax.

pub mod core;
pub mod predictor;
pub mod processors;
pub mod utils;

/// Commonly used types and functions.
pub mod prelude {
    pub use crate::core::{
        ClassifierError, InferenceBackend, ModelConfig, OrtInference, OrtSessionConfig,
        init_tracing,
    };
    pub use crate::predictor::{DigitClassifier, DigitClassifierBuilder, DigitPrediction};
    pub use crate::utils::{load_image, load_images_batch};
}
