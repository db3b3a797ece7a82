//! Error types for the digit classification pipeline.
//!
//! Every failure in the pipeline maps onto a distinct [`ClassifierError`]
//! variant: image loading, model loading, preprocessing stages, inference,
//! and configuration problems each carry their own context. All variants are
//! fatal; the pipeline never retries or recovers.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Convenient result alias for classifier operations.
pub type ClassifierResult<T> = Result<T, ClassifierError>;

/// Identifies which preprocessing stage an error occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    /// Error occurred during pixel normalization.
    Normalization,
    /// Error occurred during image resizing.
    Resize,
    /// Error occurred during tensor operations.
    TensorOperation,
    /// Error occurred during post-processing.
    PostProcessing,
    /// Generic processing error.
    Generic,
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStage::Normalization => write!(f, "normalization"),
            ProcessingStage::Resize => write!(f, "resize"),
            ProcessingStage::TensorOperation => write!(f, "tensor operation"),
            ProcessingStage::PostProcessing => write!(f, "post-processing"),
            ProcessingStage::Generic => write!(f, "processing"),
        }
    }
}

/// A minimal string-backed error used when no richer source error exists.
#[derive(Debug)]
pub struct SimpleError {
    message: String,
}

impl SimpleError {
    /// Creates a new SimpleError with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for SimpleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SimpleError {}

/// Errors that can occur in the digit classification pipeline.
#[derive(Error, Debug)]
pub enum ClassifierError {
    /// The input image could not be read or decoded.
    #[error("failed to read image '{}'", path.display())]
    ImageLoad {
        /// Path of the image that failed to load.
        path: PathBuf,
        /// The underlying decoding error.
        #[source]
        source: image::ImageError,
    },

    /// The model file could not be loaded into an inference session.
    #[error("failed to load model '{}': {context}", path.display())]
    ModelLoad {
        /// Path of the model that failed to load.
        path: PathBuf,
        /// Additional context about the failure.
        context: String,
        /// The underlying runtime error, if one was produced.
        #[source]
        source: Option<ort::Error>,
    },

    /// A preprocessing or post-processing stage failed.
    #[error("{kind} failed: {context}")]
    Processing {
        /// The stage where the error occurred.
        kind: ProcessingStage,
        /// Additional context about the error.
        context: String,
        /// The underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Model invocation failed. The `operation` names the step that failed
    /// (tensor bind, forward pass, or output extraction).
    #[error("inference with model '{model_name}' failed during {operation}: {context}")]
    Inference {
        /// Name of the model being invoked.
        model_name: String,
        /// The inference step that failed.
        operation: String,
        /// Additional context about the failure.
        context: String,
        /// The underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The caller supplied input the pipeline cannot process.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// A configuration value is out of range or inconsistent.
    #[error("configuration: {message}")]
    Config {
        /// A message describing the configuration error.
        message: String,
    },

    /// Error from the ONNX Runtime session.
    #[error(transparent)]
    Session(#[from] ort::Error),

    /// Error from tensor shape operations.
    #[error("tensor operation")]
    Tensor(#[from] ndarray::ShapeError),

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

impl ClassifierError {
    /// Creates an error for an image that could not be loaded.
    pub fn image_load(path: &Path, source: image::ImageError) -> Self {
        Self::ImageLoad {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Creates an error for a model that could not be loaded.
    pub fn model_load(path: &Path, context: impl Into<String>, source: Option<ort::Error>) -> Self {
        Self::ModelLoad {
            path: path.to_path_buf(),
            context: context.into(),
            source,
        }
    }

    /// Creates an error for a failed inference step.
    pub fn inference(
        model_name: impl Into<String>,
        operation: impl Into<String>,
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Inference {
            model_name: model_name.into(),
            operation: operation.into(),
            context: context.into(),
            source: Box::new(source),
        }
    }

    #[inline]
    fn processing_with_context(
        kind: ProcessingStage,
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Processing {
            kind,
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// Creates an error for a failed normalization operation.
    pub fn normalization(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::processing_with_context(ProcessingStage::Normalization, context, source)
    }

    /// Creates an error for a failed resize operation.
    pub fn resize_error(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::processing_with_context(ProcessingStage::Resize, context, source)
    }

    /// Creates an error for a failed tensor operation.
    pub fn tensor_operation(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::processing_with_context(ProcessingStage::TensorOperation, context, source)
    }

    /// Creates an error for a failed post-processing operation.
    pub fn post_processing(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::processing_with_context(ProcessingStage::PostProcessing, context, source)
    }

    /// Creates an error for invalid input.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates an error for a configuration problem.
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn processing_stage_display() {
        assert_eq!(ProcessingStage::Normalization.to_string(), "normalization");
        assert_eq!(
            ProcessingStage::PostProcessing.to_string(),
            "post-processing"
        );
    }

    #[test]
    fn model_load_error_carries_path() {
        let err = ClassifierError::model_load(
            Path::new("models/mnist.onnx"),
            "model file not found",
            None,
        );
        let message = err.to_string();
        assert!(message.contains("models/mnist.onnx"));
        assert!(message.contains("model file not found"));
    }

    #[test]
    fn inference_error_names_operation() {
        let err = ClassifierError::inference(
            "mnist",
            "forward pass",
            "input shape [1, 1, 28, 28]",
            SimpleError::new("runtime rejected input"),
        );
        let message = err.to_string();
        assert!(message.contains("mnist"));
        assert!(message.contains("forward pass"));
    }
}
