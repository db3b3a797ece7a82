//! Image preprocessing and score post-processing.

pub mod normalization;
pub mod topk;

pub use normalization::NormalizeImage;
pub use topk::{Topk, TopkResult};
