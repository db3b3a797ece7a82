//! Tensor type aliases used across the pipeline.

/// A 2D tensor of f32 values, `(batch, classes)` for model outputs.
pub type Tensor2D = ndarray::Array2<f32>;

/// A 4D tensor of f32 values, `(batch, channels, height, width)` for model inputs.
pub type Tensor4D = ndarray::Array4<f32>;
