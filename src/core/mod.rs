//! Core components of the classification pipeline: error handling,
//! configuration, tensor aliases, the inference engine, and the backend
//! capability trait.

pub mod config;
pub mod errors;
pub mod inference;
pub mod tensor;
pub mod traits;

pub use config::{ModelConfig, OrtGraphOptimizationLevel, OrtSessionConfig};
pub use errors::{ClassifierError, ClassifierResult, ProcessingStage};
pub use inference::OrtInference;
pub use tensor::{Tensor2D, Tensor4D};
pub use traits::InferenceBackend;

/// Initializes the tracing subscriber for logging.
///
/// Sets up the subscriber with an environment filter and a formatting layer.
/// Call once at application startup.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}
