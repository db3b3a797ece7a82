//! Image loading and conversion helpers.

use crate::core::errors::ClassifierError;
use image::{DynamicImage, GrayImage, ImageBuffer};
use std::path::Path;

/// Batches above this size are loaded in parallel.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 8;

/// Converts a DynamicImage to an 8-bit grayscale image using the fixed
/// luminance weighting of the `image` crate.
pub fn dynamic_to_gray(img: DynamicImage) -> GrayImage {
    img.to_luma8()
}

/// Loads an image from a file path and converts it to grayscale.
///
/// # Errors
///
/// Returns [`ClassifierError::ImageLoad`] carrying the path if the file is
/// missing, unreadable, or not a decodable image.
pub fn load_image(path: &Path) -> Result<GrayImage, ClassifierError> {
    let img = image::open(path).map_err(|e| ClassifierError::image_load(path, e))?;
    Ok(dynamic_to_gray(img))
}

/// Creates a grayscale image from raw pixel data.
///
/// Returns `None` if the data length does not match `width * height`.
pub fn create_gray_image(width: u32, height: u32, data: Vec<u8>) -> Option<GrayImage> {
    if data.len() != (width * height) as usize {
        return None;
    }
    ImageBuffer::from_raw(width, height, data)
}

/// Loads a batch of images, in parallel above [`DEFAULT_PARALLEL_THRESHOLD`].
pub fn load_images_batch<P: AsRef<Path> + Send + Sync>(
    paths: &[P],
) -> Result<Vec<GrayImage>, ClassifierError> {
    load_images_batch_with_threshold(paths, None)
}

/// Loads a batch of images with a custom parallel threshold.
pub fn load_images_batch_with_threshold<P: AsRef<Path> + Send + Sync>(
    paths: &[P],
    parallel_threshold: Option<usize>,
) -> Result<Vec<GrayImage>, ClassifierError> {
    let threshold = parallel_threshold.unwrap_or(DEFAULT_PARALLEL_THRESHOLD);

    if paths.len() > threshold {
        use rayon::prelude::*;
        paths.par_iter().map(|p| load_image(p.as_ref())).collect()
    } else {
        paths.iter().map(|p| load_image(p.as_ref())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_image_is_an_image_load_error() {
        let err = load_image(Path::new("does/not/exist.png")).unwrap_err();
        match err {
            ClassifierError::ImageLoad { path, .. } => {
                assert_eq!(path, Path::new("does/not/exist.png"));
            }
            other => panic!("expected ImageLoad, got {other:?}"),
        }
    }

    #[test]
    fn create_gray_image_checks_length() {
        assert!(create_gray_image(2, 2, vec![0; 4]).is_some());
        assert!(create_gray_image(2, 2, vec![0; 3]).is_none());
    }

    #[test]
    fn batch_load_propagates_the_first_failure() {
        let paths = [Path::new("a.png"), Path::new("b.png")];
        assert!(load_images_batch(&paths).is_err());
    }
}
