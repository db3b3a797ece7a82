//! Digit classification command line tool.
//!
//! Loads one or more images of handwritten digits, runs them through an ONNX
//! classification model, and prints the predicted digit and its confidence.
//!
//! Usage:
//! ```
//! classify_digit --model-path model/mnist.onnx data/zero.png
//! ```
//!
//! For batch processing of multiple images in a single model invocation, add
//! the `--batch` flag.

use clap::Parser;
use digit_classifier::core::init_tracing;
use digit_classifier::predictor::{DigitClassifierBuilder, DigitPrediction};
use std::path::Path;
use tracing::{error, info};

/// Command-line arguments for the digit classification tool.
#[derive(Parser)]
#[command(name = "classify_digit")]
#[command(about = "Classifies handwritten digit images with an ONNX model")]
struct Args {
    /// Path to the ONNX model file
    #[arg(short, long)]
    model_path: String,

    /// Image file paths to classify
    #[arg(required = true)]
    images: Vec<String>,

    /// Number of top predictions to report per image
    #[arg(short, long, default_value_t = 1)]
    topk: usize,

    /// Classify all images in a single batched model invocation
    #[arg(short, long)]
    batch: bool,
}

/// Prints the prediction for image `index` of the batch.
fn print_prediction(path: &str, index: usize, prediction: &DigitPrediction) {
    info!("{}", path);
    if let Some((digit, confidence)) = prediction.best_for(index) {
        println!("Predicted Digit: {digit}");
        println!("Confidence: {confidence}");
    }
    if let (Some(ids), Some(scores)) = (
        prediction.class_ids.get(index),
        prediction.scores.get(index),
    ) {
        for (id, score) in ids.iter().zip(scores.iter()).skip(1) {
            info!("   runner-up: {} (score: {:.3})", id, score);
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args = Args::parse();

    if !Path::new(&args.model_path).exists() {
        error!("Model file not found: {}", args.model_path);
        return Err("model file not found".into());
    }

    // Missing images are fatal before any inference work starts.
    let missing: Vec<&String> = args
        .images
        .iter()
        .filter(|path| !Path::new(path).exists())
        .collect();
    if !missing.is_empty() {
        for path in &missing {
            error!("Image file not found: {}", path);
        }
        return Err("image file not found".into());
    }

    let classifier = DigitClassifierBuilder::new()
        .topk(args.topk)
        .build(Path::new(&args.model_path))?;

    if args.batch && args.images.len() > 1 {
        info!("Classifying {} images in one batch...", args.images.len());
        let paths: Vec<&Path> = args.images.iter().map(Path::new).collect();
        let prediction = classifier.classify_paths(&paths)?;
        for (index, path) in args.images.iter().enumerate() {
            print_prediction(path, index, &prediction);
        }
    } else {
        for path in &args.images {
            let prediction = classifier.classify_path(Path::new(path))?;
            print_prediction(path, 0, &prediction);
        }
    }

    Ok(())
}
