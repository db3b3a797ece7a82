//! The capability interface between the pipeline and an inference runtime.

use crate::core::errors::ClassifierError;
use crate::core::tensor::{Tensor2D, Tensor4D};

/// A backend that scores image batches against a classification model.
///
/// Resource allocation happens when a backend is constructed; this trait
/// exposes the remaining surface the pipeline needs: bind an input batch,
/// invoke the model, and read back the class scores as one call, plus
/// introspection of the model-declared input shape. Keeping the interface
/// this narrow lets a different runtime stand in for ONNX Runtime without
/// touching the surrounding pipeline.
pub trait InferenceBackend {
    /// Binds the `(N, C, H, W)` batch, runs the model, and reads back the
    /// `(N, num_classes)` raw score matrix.
    fn class_scores(&self, batch: &Tensor4D) -> Result<Tensor2D, ClassifierError>;

    /// The model-declared input shape, dynamic dimensions as-is.
    fn input_shape(&self) -> Option<Vec<i64>> {
        None
    }

    /// A short name identifying the loaded model, used in error context.
    fn model_name(&self) -> &str;
}
