//! Digit classification over a 10-class model.
//!
//! The classifier runs one strictly forward pass: grayscale images are
//! resized to the model input size, normalized into an `(N, 1, H, W)` batch,
//! scored by the backend, and reduced to class ids by top-k extraction.

use crate::core::config::{ModelConfig, OrtSessionConfig};
use crate::core::errors::ClassifierError;
use crate::core::inference::OrtInference;
use crate::core::tensor::{Tensor2D, Tensor4D};
use crate::core::traits::InferenceBackend;
use crate::processors::{NormalizeImage, Topk};
use crate::utils::{load_image, load_images_batch};
use image::{GrayImage, imageops::FilterType};
use std::path::Path;
use tracing::debug;

/// Classification output for a batch of images.
#[derive(Debug, Clone)]
pub struct DigitPrediction {
    /// Top-k class ids per image, best first.
    pub class_ids: Vec<Vec<usize>>,
    /// Raw scores for the class ids. Only a probability if the model's final
    /// layer applies softmax; reported as-is either way.
    pub scores: Vec<Vec<f32>>,
    /// Label names for the class ids, if labels are configured.
    pub labels: Option<Vec<Vec<String>>>,
}

impl DigitPrediction {
    /// The top prediction for the first image.
    pub fn best(&self) -> Option<(usize, f32)> {
        self.best_for(0)
    }

    /// The top prediction for image `index` in the batch.
    pub fn best_for(&self, index: usize) -> Option<(usize, f32)> {
        let id = *self.class_ids.get(index)?.first()?;
        let score = *self.scores.get(index)?.first()?;
        Some((id, score))
    }
}

/// Classifies handwritten digit images with a 10-class model.
///
/// Generic over the [`InferenceBackend`] so a different runtime can stand in
/// for ONNX Runtime without changing the pipeline.
#[derive(Debug)]
pub struct DigitClassifier<B = OrtInference> {
    backend: B,
    normalizer: NormalizeImage,
    topk: Topk,
    input_shape: (u32, u32),
    resize_filter: FilterType,
    k: usize,
}

impl<B: InferenceBackend> DigitClassifier<B> {
    /// Resizes and normalizes images into an `(N, 1, H, W)` batch tensor.
    pub fn preprocess(&self, images: Vec<GrayImage>) -> Result<Tensor4D, ClassifierError> {
        let (height, width) = self.input_shape;
        let resized: Vec<GrayImage> = images
            .into_iter()
            .map(|img| image::imageops::resize(&img, width, height, self.resize_filter))
            .collect();
        self.normalizer.normalize_batch_to(resized)
    }

    /// Runs the backend on a preprocessed batch.
    pub fn infer(&self, batch: &Tensor4D) -> Result<Tensor2D, ClassifierError> {
        debug!(
            model = self.backend.model_name(),
            shape = ?batch.shape(),
            "running inference"
        );
        self.backend.class_scores(batch)
    }

    /// Reduces raw score rows to class ids, scores, and labels.
    pub fn postprocess(&self, scores: &Tensor2D) -> Result<DigitPrediction, ClassifierError> {
        let rows: Vec<Vec<f32>> = scores.outer_iter().map(|row| row.to_vec()).collect();
        let result = self.topk.process(&rows, self.k)?;
        Ok(DigitPrediction {
            class_ids: result.indexes,
            scores: result.scores,
            labels: result.labels,
        })
    }

    /// The full pipeline: preprocess, infer, postprocess.
    pub fn classify(&self, images: Vec<GrayImage>) -> Result<DigitPrediction, ClassifierError> {
        let batch = self.preprocess(images)?;
        let scores = self.infer(&batch)?;
        self.postprocess(&scores)
    }

    /// Loads one image from disk and classifies it.
    pub fn classify_path(&self, path: &Path) -> Result<DigitPrediction, ClassifierError> {
        let img = load_image(path)?;
        self.classify(vec![img])
    }

    /// Loads a batch of images from disk and classifies them together.
    pub fn classify_paths<P: AsRef<Path> + Send + Sync>(
        &self,
        paths: &[P],
    ) -> Result<DigitPrediction, ClassifierError> {
        let imgs = load_images_batch(paths)?;
        self.classify(imgs)
    }

    /// The backend this classifier scores with.
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

/// Builder for [`DigitClassifier`].
#[derive(Debug, Clone)]
pub struct DigitClassifierBuilder {
    input_shape: (u32, u32),
    resize_filter: FilterType,
    k: usize,
    labels: Option<Vec<String>>,
    normalize_scale: Option<f32>,
    normalize_mean: Option<f32>,
    normalize_std: Option<f32>,
    input_name: Option<String>,
    ort_session: Option<OrtSessionConfig>,
}

impl DigitClassifierBuilder {
    /// Creates a builder with digit defaults: 28x28 input, linear
    /// interpolation, top-1, labels "0" through "9".
    pub fn new() -> Self {
        Self {
            input_shape: (28, 28),
            resize_filter: FilterType::Triangle,
            k: 1,
            labels: Some((0..10).map(|d| d.to_string()).collect()),
            normalize_scale: None,
            normalize_mean: None,
            normalize_std: None,
            input_name: None,
            ort_session: None,
        }
    }

    /// Sets the model input shape as (height, width).
    pub fn input_shape(mut self, shape: (u32, u32)) -> Self {
        self.input_shape = shape;
        self
    }

    /// Sets the resize interpolation filter.
    pub fn resize_filter(mut self, filter: FilterType) -> Self {
        self.resize_filter = filter;
        self
    }

    /// Sets how many top predictions to report per image.
    pub fn topk(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Replaces the label set, index = class id.
    pub fn labels(mut self, labels: Vec<String>) -> Self {
        self.labels = Some(labels);
        self
    }

    /// Drops the label set; predictions report bare class ids.
    pub fn without_labels(mut self) -> Self {
        self.labels = None;
        self
    }

    /// Overrides normalization parameters (scale, mean, std).
    pub fn normalize(mut self, scale: f32, mean: f32, std: f32) -> Self {
        self.normalize_scale = Some(scale);
        self.normalize_mean = Some(mean);
        self.normalize_std = Some(std);
        self
    }

    /// Overrides the model's input tensor name.
    pub fn input_name(mut self, name: impl Into<String>) -> Self {
        self.input_name = Some(name.into());
        self
    }

    /// Applies an ONNX Runtime session configuration.
    pub fn ort_session(mut self, config: OrtSessionConfig) -> Self {
        self.ort_session = Some(config);
        self
    }

    /// Builds an ONNX-backed classifier from a model file.
    pub fn build(
        self,
        model_path: &Path,
    ) -> Result<DigitClassifier<OrtInference>, ClassifierError> {
        let config = ModelConfig {
            model_path: Some(model_path.to_path_buf()),
            model_name: None,
            input_name: self.input_name.clone(),
            ort_session: self.ort_session.clone(),
        };
        let backend = OrtInference::from_config(&config, model_path)?;
        self.with_backend(backend)
    }

    /// Builds a classifier over any [`InferenceBackend`].
    pub fn with_backend<B: InferenceBackend>(
        self,
        backend: B,
    ) -> Result<DigitClassifier<B>, ClassifierError> {
        if self.k == 0 {
            return Err(ClassifierError::config_error("topk must be greater than 0"));
        }
        let normalizer = NormalizeImage::new(
            self.normalize_scale,
            self.normalize_mean,
            self.normalize_std,
        )?;
        let topk = match self.labels {
            Some(labels) => Topk::from_labels(labels),
            None => Topk::without_labels(),
        };
        Ok(DigitClassifier {
            backend,
            normalizer,
            topk,
            input_shape: self.input_shape,
            resize_filter: self.resize_filter,
            k: self.k,
        })
    }
}

impl Default for DigitClassifierBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::SimpleError;

    /// Backend returning a fixed score row for every image in the batch.
    #[derive(Debug)]
    struct FixedBackend {
        row: Vec<f32>,
    }

    impl InferenceBackend for FixedBackend {
        fn class_scores(&self, batch: &Tensor4D) -> Result<Tensor2D, ClassifierError> {
            let batch_size = batch.shape()[0];
            let flat: Vec<f32> = (0..batch_size).flat_map(|_| self.row.clone()).collect();
            Tensor2D::from_shape_vec((batch_size, self.row.len()), flat).map_err(|e| {
                ClassifierError::inference("fixed", "output extraction", "bad shape", e)
            })
        }

        fn model_name(&self) -> &str {
            "fixed"
        }
    }

    /// Backend that must never be reached.
    #[derive(Debug)]
    struct UnreachableBackend;

    impl InferenceBackend for UnreachableBackend {
        fn class_scores(&self, _batch: &Tensor4D) -> Result<Tensor2D, ClassifierError> {
            Err(ClassifierError::inference(
                "unreachable",
                "forward pass",
                "backend invoked before input validation",
                SimpleError::new("unexpected call"),
            ))
        }

        fn model_name(&self) -> &str {
            "unreachable"
        }
    }

    fn classifier_with_row(row: Vec<f32>) -> DigitClassifier<FixedBackend> {
        DigitClassifierBuilder::new()
            .with_backend(FixedBackend { row })
            .unwrap()
    }

    fn blank(width: u32, height: u32) -> GrayImage {
        GrayImage::from_pixel(width, height, image::Luma([0]))
    }

    #[test]
    fn preprocess_yields_unit_batch_at_model_shape() {
        let classifier = classifier_with_row(vec![0.0; 10]);
        let batch = classifier.preprocess(vec![blank(64, 48)]).unwrap();
        assert_eq!(batch.shape(), &[1, 1, 28, 28]);
        assert!(batch.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn predicted_digit_is_the_argmax_of_the_raw_scores() {
        let mut row = vec![0.0f32; 10];
        row[4] = 0.9;
        row[2] = 0.3;
        let classifier = classifier_with_row(row);
        let prediction = classifier.classify(vec![blank(28, 28)]).unwrap();
        let (digit, score) = prediction.best().unwrap();
        assert_eq!(digit, 4);
        assert!((score - 0.9).abs() < f32::EPSILON);
        assert!(digit < 10);
    }

    #[test]
    fn tie_break_reports_the_lower_digit() {
        let mut row = vec![0.0f32; 10];
        row[3] = 0.5;
        row[7] = 0.5;
        let classifier = classifier_with_row(row);
        let prediction = classifier.classify(vec![blank(28, 28)]).unwrap();
        assert_eq!(prediction.best().unwrap().0, 3);
    }

    #[test]
    fn classification_is_idempotent() {
        let row = vec![0.05, 0.1, 0.02, 0.4, 0.1, 0.03, 0.05, 0.15, 0.05, 0.05];
        let classifier = classifier_with_row(row);
        let first = classifier.classify(vec![blank(28, 28)]).unwrap();
        let second = classifier.classify(vec![blank(28, 28)]).unwrap();
        assert_eq!(first.class_ids, second.class_ids);
        assert_eq!(first.scores, second.scores);
    }

    #[test]
    fn labels_follow_the_digit_ids() {
        let mut row = vec![0.0f32; 10];
        row[7] = 1.0;
        let classifier = classifier_with_row(row);
        let prediction = classifier.classify(vec![blank(28, 28)]).unwrap();
        assert_eq!(prediction.labels.unwrap()[0], vec!["7"]);
    }

    #[test]
    fn batch_predictions_keep_image_order() {
        let mut row = vec![0.0f32; 10];
        row[1] = 0.6;
        let classifier = classifier_with_row(row);
        let prediction = classifier
            .classify(vec![blank(28, 28), blank(14, 14), blank(56, 56)])
            .unwrap();
        assert_eq!(prediction.class_ids.len(), 3);
        assert_eq!(prediction.best_for(2).unwrap().0, 1);
    }

    #[test]
    fn missing_image_fails_before_the_backend_is_invoked() {
        let classifier = DigitClassifierBuilder::new()
            .with_backend(UnreachableBackend)
            .unwrap();
        let err = classifier
            .classify_path(Path::new("does/not/exist.png"))
            .unwrap_err();
        assert!(matches!(err, ClassifierError::ImageLoad { .. }));
    }

    #[test]
    fn zero_topk_is_a_configuration_error() {
        let result = DigitClassifierBuilder::new()
            .topk(0)
            .with_backend(FixedBackend { row: vec![0.0; 10] });
        assert!(matches!(result, Err(ClassifierError::Config { .. })));
    }

    #[test]
    fn topk_reports_k_predictions_in_score_order() {
        let mut row = vec![0.0f32; 10];
        row[2] = 0.5;
        row[8] = 0.3;
        row[0] = 0.1;
        let classifier = DigitClassifierBuilder::new()
            .topk(3)
            .with_backend(FixedBackend { row })
            .unwrap();
        let prediction = classifier.classify(vec![blank(28, 28)]).unwrap();
        assert_eq!(prediction.class_ids[0], vec![2, 8, 0]);
    }
}
