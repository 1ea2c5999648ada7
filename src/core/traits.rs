//! Core traits for SGD-SVM training

use crate::core::SparseVector;

/// Indexable sequence of (sparse feature vector, label) pairs the trainer
/// consumes.
///
/// Features are handed out by reference: the training loop reads every
/// example once per epoch and must not clone vectors on the hot path.
pub trait Dataset: Send + Sync {
    /// Number of examples in the dataset
    fn len(&self) -> usize;

    /// Number of features (dimensionality)
    fn dim(&self) -> usize;

    /// Borrow the feature vector of example `i`
    ///
    /// # Panics
    /// Panics if index >= len()
    fn feature(&self, i: usize) -> &SparseVector;

    /// Label of example `i`, always +1 or -1
    ///
    /// # Panics
    /// Panics if index >= len()
    fn label(&self, i: usize) -> f64;

    /// Get all labels as a vector
    fn labels(&self) -> Vec<f64> {
        (0..self.len()).map(|i| self.label(i)).collect()
    }

    /// Check if the dataset is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
