//! ONNX Runtime inference engine for classification models.

use crate::core::config::{ModelConfig, OrtGraphOptimizationLevel, OrtSessionConfig};
use crate::core::errors::ClassifierError;
use crate::core::tensor::{Tensor2D, Tensor4D};
use crate::core::traits::InferenceBackend;
use ndarray::ArrayView2;
use ort::logging::LogLevel;
use ort::session::Session;
use ort::session::builder::{GraphOptimizationLevel, SessionBuilder};
use ort::value::{TensorRef, ValueType};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Wraps one ONNX Runtime session holding a loaded classification model.
///
/// The session and its internal tensor buffers are allocated at construction
/// and released when the engine is dropped, whether or not an invocation
/// failed in between. Input and output tensor names are discovered from the
/// model metadata (single input, single output) unless overridden.
pub struct OrtInference {
    session: Mutex<Session>,
    input_name: String,
    output_name: String,
    model_path: PathBuf,
    model_name: String,
}

impl std::fmt::Debug for OrtInference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrtInference")
            .field("input_name", &self.input_name)
            .field("output_name", &self.output_name)
            .field("model_path", &self.model_path)
            .field("model_name", &self.model_name)
            .finish()
    }
}

impl OrtInference {
    /// Creates an engine with default ONNX Runtime settings.
    pub fn new(model_path: impl AsRef<Path>) -> Result<Self, ClassifierError> {
        Self::with_session_config(model_path.as_ref(), None, None, None)
    }

    /// Creates an engine from a [`ModelConfig`], applying its session
    /// configuration and name overrides.
    pub fn from_config(
        config: &ModelConfig,
        model_path: impl AsRef<Path>,
    ) -> Result<Self, ClassifierError> {
        Self::with_session_config(
            model_path.as_ref(),
            config.ort_session.as_ref(),
            config.input_name.as_deref(),
            config.model_name.as_deref(),
        )
    }

    fn with_session_config(
        path: &Path,
        session_config: Option<&OrtSessionConfig>,
        input_override: Option<&str>,
        name_override: Option<&str>,
    ) -> Result<Self, ClassifierError> {
        if !path.is_file() {
            return Err(ClassifierError::model_load(
                path,
                "model file not found",
                None,
            ));
        }

        let mut builder = Session::builder()?.with_log_level(LogLevel::Error)?;
        if let Some(cfg) = session_config {
            builder = Self::apply_session_config(builder, cfg)?;
        }
        let session = builder.commit_from_file(path).map_err(|e| {
            ClassifierError::model_load(path, "failed to create ONNX session", Some(e))
        })?;

        let input_name = match input_override {
            Some(name) => name.to_string(),
            None => session
                .inputs
                .first()
                .map(|input| input.name.clone())
                .ok_or_else(|| {
                    ClassifierError::model_load(path, "model declares no inputs", None)
                })?,
        };
        let output_name = session
            .outputs
            .first()
            .map(|output| output.name.clone())
            .ok_or_else(|| ClassifierError::model_load(path, "model declares no outputs", None))?;

        let model_name = name_override
            .map(str::to_string)
            .or_else(|| {
                path.file_stem()
                    .and_then(|stem| stem.to_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| "unknown_model".to_string());

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            output_name,
            model_path: path.to_path_buf(),
            model_name,
        })
    }

    fn apply_session_config(
        mut builder: SessionBuilder,
        cfg: &OrtSessionConfig,
    ) -> Result<SessionBuilder, ort::Error> {
        if let Some(intra) = cfg.intra_threads {
            builder = builder.with_intra_threads(intra)?;
        }
        if let Some(inter) = cfg.inter_threads {
            builder = builder.with_inter_threads(inter)?;
        }
        if let Some(parallel) = cfg.parallel_execution {
            builder = builder.with_parallel_execution(parallel)?;
        }
        if let Some(level) = cfg.optimization_level {
            let mapped = match level {
                OrtGraphOptimizationLevel::DisableAll => GraphOptimizationLevel::Disable,
                OrtGraphOptimizationLevel::Level1 => GraphOptimizationLevel::Level1,
                OrtGraphOptimizationLevel::Level2 => GraphOptimizationLevel::Level2,
                OrtGraphOptimizationLevel::Level3 | OrtGraphOptimizationLevel::All => {
                    GraphOptimizationLevel::Level3
                }
            };
            builder = builder.with_optimization_level(mapped)?;
        }
        Ok(builder)
    }

    /// Returns the model path this engine was loaded from.
    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    /// Returns the model name used in error context.
    pub fn name(&self) -> &str {
        &self.model_name
    }

    /// The model-declared shape of the primary input tensor.
    ///
    /// Dynamic dimensions (e.g. -1) are returned as-is. No validation of
    /// prepared batches happens here; a mismatch surfaces as an inference
    /// error at invocation time.
    pub fn primary_input_shape(&self) -> Option<Vec<i64>> {
        let session = self.session.lock().ok()?;
        let input = session.inputs.first()?;
        match &input.input_type {
            ValueType::Tensor { shape, .. } => Some(shape.iter().copied().collect()),
            _ => None,
        }
    }

    /// Binds the batch, runs the model, and extracts the `(N, num_classes)`
    /// score matrix.
    pub fn infer_2d(&self, batch: &Tensor4D) -> Result<Tensor2D, ClassifierError> {
        let batch_size = batch.shape()[0];
        let input_shape = batch.shape().to_vec();

        let input_tensor = TensorRef::from_array_view(batch.view()).map_err(|e| {
            ClassifierError::inference(
                &self.model_name,
                "tensor bind",
                format!("failed to bind input tensor with shape {input_shape:?}"),
                e,
            )
        })?;
        let inputs = ort::inputs![self.input_name.as_str() => input_tensor];

        let mut session = self.session.lock().map_err(|_| {
            ClassifierError::invalid_input("failed to acquire inference session lock")
        })?;
        let outputs = session.run(inputs).map_err(|e| {
            ClassifierError::inference(
                &self.model_name,
                "forward pass",
                format!(
                    "input '{}' with shape {:?} -> output '{}'",
                    self.input_name, input_shape, self.output_name
                ),
                e,
            )
        })?;

        let (output_shape, output_data) = outputs[self.output_name.as_str()]
            .try_extract_tensor::<f32>()
            .map_err(|e| {
                ClassifierError::inference(
                    &self.model_name,
                    "output extraction",
                    format!("failed to extract output '{}' as f32", self.output_name),
                    e,
                )
            })?;

        if output_shape.len() != 2 {
            return Err(ClassifierError::invalid_input(format!(
                "model '{}' produced a {}D output with shape {:?}, expected (batch, classes)",
                self.model_name,
                output_shape.len(),
                output_shape
            )));
        }
        let num_classes = output_shape[1] as usize;
        if output_data.len() != batch_size * num_classes {
            return Err(ClassifierError::invalid_input(format!(
                "output data size mismatch: expected {}, got {}",
                batch_size * num_classes,
                output_data.len()
            )));
        }

        let view = ArrayView2::from_shape((batch_size, num_classes), output_data)
            .map_err(ClassifierError::Tensor)?;
        Ok(view.to_owned())
    }
}

impl InferenceBackend for OrtInference {
    fn class_scores(&self, batch: &Tensor4D) -> Result<Tensor2D, ClassifierError> {
        self.infer_2d(batch)
    }

    fn input_shape(&self) -> Option<Vec<i64>> {
        self.primary_input_shape()
    }

    fn model_name(&self) -> &str {
        self.name()
    }
}
