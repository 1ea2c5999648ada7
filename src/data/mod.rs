//! Dataset container and storage formats
//!
//! [`SvmDataset`] is the in-memory accumulator the trainer consumes; the
//! submodules load and save it in the LibSVM text format and the native
//! binary format.

pub mod binary;
pub mod libsvm;

pub use self::binary::*;
pub use self::libsvm::*;

use crate::core::{Dataset, Result, Sample, SparseVector, SvmError};

/// Append-only accumulator of labeled sparse examples.
///
/// Tracks running positive/negative counts and the maximum observed feature
/// dimension. Entries are never mutated after being added, with one
/// exception: [`relabel`](SvmDataset::relabel) flips the label of an
/// existing entry by position, which is how callers rebalance classes.
#[derive(Debug, Clone, Default)]
pub struct SvmDataset {
    features: Vec<SparseVector>,
    labels: Vec<f64>,
    positive: usize,
    negative: usize,
    dim: usize,
}

impl SvmDataset {
    /// Create an empty dataset
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one example. The label must be exactly +1 or -1; anything else
    /// is rejected rather than coerced.
    pub fn add(&mut self, features: SparseVector, label: f64) -> Result<()> {
        check_label(label)?;
        if label > 0.0 {
            self.positive += 1;
        } else {
            self.negative += 1;
        }
        self.dim = self.dim.max(features.dim());
        self.features.push(features);
        self.labels.push(label);
        Ok(())
    }

    /// Replace the label of example `i`, keeping the counts consistent.
    pub fn relabel(&mut self, i: usize, label: f64) -> Result<()> {
        check_label(label)?;
        if i >= self.labels.len() {
            return Err(SvmError::IndexOutOfRange {
                index: i,
                len: self.labels.len(),
            });
        }
        let old = self.labels[i];
        if old == label {
            return Ok(());
        }
        if old > 0.0 {
            self.positive -= 1;
            self.negative += 1;
        } else {
            self.negative -= 1;
            self.positive += 1;
        }
        self.labels[i] = label;
        Ok(())
    }

    /// Owned copy of example `i` as a sample
    ///
    /// # Panics
    /// Panics if index >= len()
    pub fn get_sample(&self, i: usize) -> Sample {
        Sample::new(self.features[i].clone(), self.labels[i])
    }

    /// Number of positively labeled examples
    pub fn positive(&self) -> usize {
        self.positive
    }

    /// Number of negatively labeled examples
    pub fn negative(&self) -> usize {
        self.negative
    }
}

impl Dataset for SvmDataset {
    fn len(&self) -> usize {
        self.labels.len()
    }

    fn dim(&self) -> usize {
        self.dim
    }

    fn feature(&self, i: usize) -> &SparseVector {
        &self.features[i]
    }

    fn label(&self, i: usize) -> f64 {
        self.labels[i]
    }

    fn labels(&self) -> Vec<f64> {
        self.labels.clone()
    }
}

fn check_label(label: f64) -> Result<()> {
    if label != 1.0 && label != -1.0 {
        return Err(SvmError::InvalidLabel(label));
    }
    Ok(())
}
