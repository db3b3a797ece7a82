//! Pixel normalization for grayscale model inputs.

use crate::core::errors::ClassifierError;
use crate::core::tensor::Tensor4D;
use image::GrayImage;

/// Normalizes grayscale pixel intensities into model input range.
///
/// The transform `(value * scale - mean) / std` is folded into
/// `value * alpha + beta` with `alpha = scale / std` and `beta = -mean / std`.
/// With the defaults (scale 1/255, mean 0, std 1) intensities map onto
/// [0.0, 1.0]: an all-black image becomes an all-zero tensor and an all-white
/// image an all-one tensor.
#[derive(Debug, Clone)]
pub struct NormalizeImage {
    /// Multiplicative coefficient (scale / std).
    pub alpha: f32,
    /// Additive offset (-mean / std).
    pub beta: f32,
}

impl NormalizeImage {
    /// Creates a normalizer from scale (default 1/255), mean (default 0.0),
    /// and standard deviation (default 1.0).
    ///
    /// # Errors
    ///
    /// Returns a configuration error if scale or std is not positive, or if
    /// the folded coefficients are not finite.
    pub fn new(
        scale: Option<f32>,
        mean: Option<f32>,
        std: Option<f32>,
    ) -> Result<Self, ClassifierError> {
        let scale = scale.unwrap_or(1.0 / 255.0);
        let mean = mean.unwrap_or(0.0);
        let std = std.unwrap_or(1.0);

        if scale <= 0.0 {
            return Err(ClassifierError::config_error(format!(
                "scale must be greater than 0, got {scale}"
            )));
        }
        if std <= 0.0 {
            return Err(ClassifierError::config_error(format!(
                "standard deviation must be greater than 0, got {std}"
            )));
        }

        let alpha = scale / std;
        let beta = -mean / std;
        if !alpha.is_finite() || !beta.is_finite() {
            return Err(ClassifierError::config_error(format!(
                "normalization coefficients are not finite: alpha={alpha}, beta={beta}"
            )));
        }

        Ok(Self { alpha, beta })
    }

    /// Normalizes a single image into a row-major `H * W` buffer.
    pub fn normalize(&self, img: &GrayImage) -> Vec<f32> {
        img.pixels()
            .map(|pixel| pixel[0] as f32 * self.alpha + self.beta)
            .collect()
    }

    /// Normalizes a batch of same-sized images into an `(N, 1, H, W)` tensor.
    ///
    /// # Errors
    ///
    /// Returns an invalid-input error if the batch is empty or the images do
    /// not all share the same dimensions.
    pub fn normalize_batch_to(&self, imgs: Vec<GrayImage>) -> Result<Tensor4D, ClassifierError> {
        let Some(first) = imgs.first() else {
            return Err(ClassifierError::invalid_input("empty image batch"));
        };
        let (width, height) = first.dimensions();
        for (idx, img) in imgs.iter().enumerate().skip(1) {
            if img.dimensions() != (width, height) {
                return Err(ClassifierError::invalid_input(format!(
                    "image {idx} has dimensions {:?}, expected {:?}",
                    img.dimensions(),
                    (width, height)
                )));
            }
        }

        let mut batch = Tensor4D::zeros((imgs.len(), 1, height as usize, width as usize));
        for (n, img) in imgs.iter().enumerate() {
            for (x, y, pixel) in img.enumerate_pixels() {
                batch[[n, 0, y as usize, x as usize]] =
                    pixel[0] as f32 * self.alpha + self.beta;
            }
        }
        Ok(batch)
    }
}

impl Default for NormalizeImage {
    fn default() -> Self {
        Self {
            alpha: 1.0 / 255.0,
            beta: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, value: u8) -> GrayImage {
        GrayImage::from_pixel(width, height, image::Luma([value]))
    }

    #[test]
    fn all_black_normalizes_to_zeros() {
        let normalizer = NormalizeImage::new(None, None, None).unwrap();
        let batch = normalizer.normalize_batch_to(vec![solid(28, 28, 0)]).unwrap();
        assert_eq!(batch.shape(), &[1, 1, 28, 28]);
        assert!(batch.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn all_white_normalizes_to_ones() {
        let normalizer = NormalizeImage::new(None, None, None).unwrap();
        let batch = normalizer
            .normalize_batch_to(vec![solid(28, 28, 255)])
            .unwrap();
        assert!(batch.iter().all(|&v| (v - 1.0).abs() < f32::EPSILON));
    }

    #[test]
    fn preserves_row_major_layout() {
        let mut img = solid(2, 2, 0);
        img.put_pixel(1, 0, image::Luma([255]));
        let normalizer = NormalizeImage::new(None, None, None).unwrap();
        let batch = normalizer.normalize_batch_to(vec![img]).unwrap();
        assert_eq!(batch[[0, 0, 0, 0]], 0.0);
        assert_eq!(batch[[0, 0, 0, 1]], 1.0);
        assert_eq!(batch[[0, 0, 1, 1]], 0.0);
    }

    #[test]
    fn rejects_empty_batch() {
        let normalizer = NormalizeImage::new(None, None, None).unwrap();
        assert!(matches!(
            normalizer.normalize_batch_to(vec![]),
            Err(ClassifierError::InvalidInput { .. })
        ));
    }

    #[test]
    fn rejects_mixed_dimensions() {
        let normalizer = NormalizeImage::new(None, None, None).unwrap();
        let result = normalizer.normalize_batch_to(vec![solid(28, 28, 0), solid(14, 14, 0)]);
        assert!(matches!(result, Err(ClassifierError::InvalidInput { .. })));
    }

    #[test]
    fn rejects_non_positive_parameters() {
        assert!(NormalizeImage::new(Some(0.0), None, None).is_err());
        assert!(NormalizeImage::new(None, None, Some(-1.0)).is_err());
    }

    #[test]
    fn mean_and_std_shift_the_range() {
        let normalizer = NormalizeImage::new(Some(1.0 / 255.0), Some(0.5), Some(0.5)).unwrap();
        let values = normalizer.normalize(&solid(1, 1, 255));
        assert!((values[0] - 1.0).abs() < 1e-6);
        let values = normalizer.normalize(&solid(1, 1, 0));
        assert!((values[0] + 1.0).abs() < 1e-6);
    }
}
