//! Top-k extraction from classification scores.

use crate::core::errors::ClassifierError;

/// Top-k class indexes and scores for each prediction in a batch.
#[derive(Debug, Clone)]
pub struct TopkResult {
    /// Top-k class indexes per prediction, best first.
    pub indexes: Vec<Vec<usize>>,
    /// Raw scores corresponding to the indexes.
    pub scores: Vec<Vec<f32>>,
    /// Label names for the indexes, if a label set is configured.
    pub labels: Option<Vec<Vec<String>>>,
}

/// Extracts the top-k most confident classes from raw score rows.
///
/// Scores are reported as the model produced them; no thresholding and no
/// renormalization happens here. Ties keep ascending index order (the sort is
/// stable), so an argmax over equal maxima reports the lowest index.
#[derive(Debug, Clone)]
pub struct Topk {
    labels: Option<Vec<String>>,
}

impl Topk {
    /// Creates a processor with an optional label set, index = class id.
    pub fn new(labels: Option<Vec<String>>) -> Self {
        Self { labels }
    }

    /// Creates a processor without labels.
    pub fn without_labels() -> Self {
        Self::new(None)
    }

    /// Creates a processor labelled from a vector, index = class id.
    pub fn from_labels(labels: Vec<String>) -> Self {
        Self::new(Some(labels))
    }

    /// Whether a label set is configured.
    pub fn has_labels(&self) -> bool {
        self.labels.is_some()
    }

    /// Processes score rows into top-k results.
    ///
    /// `k` larger than a row is clamped to the row length.
    ///
    /// # Errors
    ///
    /// Returns an invalid-input error if `k` is 0 or any row is empty.
    pub fn process(&self, predictions: &[Vec<f32>], k: usize) -> Result<TopkResult, ClassifierError> {
        if k == 0 {
            return Err(ClassifierError::invalid_input("k must be greater than 0"));
        }

        let mut all_indexes = Vec::with_capacity(predictions.len());
        let mut all_scores = Vec::with_capacity(predictions.len());

        for (row_idx, prediction) in predictions.iter().enumerate() {
            if prediction.is_empty() {
                return Err(ClassifierError::invalid_input(format!(
                    "prediction {row_idx} has no class scores"
                )));
            }
            let (indexes, scores) = extract_topk(prediction, k.min(prediction.len()));
            all_indexes.push(indexes);
            all_scores.push(scores);
        }

        let labels = self.labels.as_ref().map(|labels| {
            all_indexes
                .iter()
                .map(|indexes| {
                    indexes
                        .iter()
                        .map(|&id| {
                            labels
                                .get(id)
                                .cloned()
                                .unwrap_or_else(|| format!("class_{id}"))
                        })
                        .collect()
                })
                .collect()
        });

        Ok(TopkResult {
            indexes: all_indexes,
            scores: all_scores,
            labels,
        })
    }

    /// Processes a single score row.
    pub fn process_single(&self, prediction: &[f32], k: usize) -> Result<TopkResult, ClassifierError> {
        self.process(&[prediction.to_vec()], k)
    }
}

impl Default for Topk {
    fn default() -> Self {
        Self::without_labels()
    }
}

// Stable descending sort: equal scores keep their ascending index order.
fn extract_topk(prediction: &[f32], k: usize) -> (Vec<usize>, Vec<f32>) {
    let mut indexed: Vec<(usize, f32)> = prediction.iter().copied().enumerate().collect();
    indexed.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    indexed.into_iter().take(k).unzip()
}
