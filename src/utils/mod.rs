//! Utility functions for image I/O.

pub mod image;

pub use image::{
    create_gray_image, dynamic_to_gray, load_image, load_images_batch,
    load_images_batch_with_threshold,
};
