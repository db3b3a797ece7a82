//! Configuration types for the inference session and model binding.

use crate::core::errors::ClassifierError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Graph optimization levels for ONNX Runtime.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub enum OrtGraphOptimizationLevel {
    /// Disable all optimizations.
    DisableAll,
    /// Enable basic optimizations.
    #[default]
    Level1,
    /// Enable extended optimizations.
    Level2,
    /// Enable all optimizations.
    Level3,
    /// Alias for the highest available level.
    All,
}

/// Configuration for an ONNX Runtime session.
///
/// All fields are optional; unset fields keep the runtime defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrtSessionConfig {
    /// Number of threads used to parallelize execution within nodes.
    pub intra_threads: Option<usize>,
    /// Number of threads used to parallelize execution across nodes.
    pub inter_threads: Option<usize>,
    /// Enable parallel execution mode.
    pub parallel_execution: Option<bool>,
    /// Graph optimization level.
    pub optimization_level: Option<OrtGraphOptimizationLevel>,
}

impl OrtSessionConfig {
    /// Creates a new OrtSessionConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of intra-op threads.
    pub fn with_intra_threads(mut self, threads: usize) -> Self {
        self.intra_threads = Some(threads);
        self
    }

    /// Sets the number of inter-op threads.
    pub fn with_inter_threads(mut self, threads: usize) -> Self {
        self.inter_threads = Some(threads);
        self
    }

    /// Enables or disables parallel execution mode.
    pub fn with_parallel_execution(mut self, parallel: bool) -> Self {
        self.parallel_execution = Some(parallel);
        self
    }

    /// Sets the graph optimization level.
    pub fn with_optimization_level(mut self, level: OrtGraphOptimizationLevel) -> Self {
        self.optimization_level = Some(level);
        self
    }
}

/// Binding of a model file to the inference engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Path to the model file.
    pub model_path: Option<PathBuf>,
    /// Display name of the model; defaults to the file stem.
    pub model_name: Option<String>,
    /// Name of the model's input tensor; discovered from the model if unset.
    pub input_name: Option<String>,
    /// Session configuration applied when the engine is built.
    pub ort_session: Option<OrtSessionConfig>,
}

impl ModelConfig {
    /// Creates an empty ModelConfig.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a ModelConfig from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ClassifierError> {
        serde_json::from_str(json)
            .map_err(|e| ClassifierError::config_error(format!("invalid model config JSON: {e}")))
    }

    /// Reads and parses a ModelConfig from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ClassifierError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_config_builder_chains() {
        let cfg = OrtSessionConfig::new()
            .with_intra_threads(2)
            .with_optimization_level(OrtGraphOptimizationLevel::Level3);
        assert_eq!(cfg.intra_threads, Some(2));
        assert!(cfg.inter_threads.is_none());
        assert!(matches!(
            cfg.optimization_level,
            Some(OrtGraphOptimizationLevel::Level3)
        ));
    }

    #[test]
    fn model_config_from_json() {
        let cfg = ModelConfig::from_json(
            r#"{
                "model_path": "model/mnist.onnx",
                "input_name": "input",
                "ort_session": { "intra_threads": 1 }
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.model_path.as_deref(), Some(Path::new("model/mnist.onnx")));
        assert_eq!(cfg.input_name.as_deref(), Some("input"));
        assert_eq!(cfg.ort_session.unwrap().intra_threads, Some(1));
    }

    #[test]
    fn model_config_rejects_malformed_json() {
        let err = ModelConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ClassifierError::Config { .. }));
    }
}
