//! Core type definitions for SGD-SVM training

use crate::core::{Result, SvmError};
use crate::loss::LossKind;

/// Prediction result containing label and decision value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Predicted class label (+1 or -1)
    pub label: f64,
    /// Raw decision function value
    pub decision_value: f64,
}

impl Prediction {
    /// Create a new prediction
    pub fn new(label: f64, decision_value: f64) -> Self {
        Self {
            label,
            decision_value,
        }
    }

    /// Get confidence as absolute value of decision value
    pub fn confidence(&self) -> f64 {
        self.decision_value.abs()
    }
}

/// Sparse feature vector with sorted indices
#[derive(Clone, Debug, PartialEq)]
pub struct SparseVector {
    /// Sorted indices of non-zero elements
    pub indices: Vec<usize>,
    /// Values corresponding to indices
    pub values: Vec<f64>,
}

impl SparseVector {
    /// Create a new sparse vector, ensuring indices are sorted
    pub fn new(indices: Vec<usize>, values: Vec<f64>) -> Self {
        assert_eq!(
            indices.len(),
            values.len(),
            "Indices and values must have same length"
        );

        let mut pairs: Vec<_> = indices.into_iter().zip(values).collect();
        pairs.sort_by_key(|&(idx, _)| idx);

        let (indices, values): (Vec<_>, Vec<_>) = pairs.into_iter().unzip();
        Self { indices, values }
    }

    /// Create an empty sparse vector
    pub fn empty() -> Self {
        Self {
            indices: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Build a sparse vector from parallel arrays of 1-based indices and values.
    ///
    /// This is the external ingestion boundary: host applications hand features
    /// over with 1-based coordinates, which are converted to 0-based here.
    /// Nonpositive or duplicate indices are rejected.
    pub fn from_one_based(indices: &[i32], values: &[f64]) -> Result<Self> {
        if indices.len() != values.len() {
            return Err(SvmError::InvalidParameter(format!(
                "index/value length mismatch: {} vs {}",
                indices.len(),
                values.len()
            )));
        }

        let mut pairs = Vec::with_capacity(indices.len());
        for (&index, &value) in indices.iter().zip(values.iter()) {
            if index <= 0 {
                return Err(SvmError::InvalidParameter(format!(
                    "feature index must be positive: {index}"
                )));
            }
            pairs.push(((index - 1) as usize, value));
        }
        pairs.sort_by_key(|&(idx, _)| idx);

        for window in pairs.windows(2) {
            if window[0].0 == window[1].0 {
                return Err(SvmError::InvalidParameter(format!(
                    "duplicate feature index: {}",
                    window[0].0 + 1
                )));
            }
        }

        let (indices, values): (Vec<_>, Vec<_>) = pairs.into_iter().unzip();
        Ok(Self { indices, values })
    }

    /// Get the value at a specific index (0 if not present)
    pub fn get(&self, index: usize) -> f64 {
        match self.indices.binary_search(&index) {
            Ok(pos) => self.values[pos],
            Err(_) => 0.0,
        }
    }

    /// Dot product with another sparse vector.
    ///
    /// Both index sequences are sorted, so a merge walk computes this in
    /// O(nnz(self) + nnz(other)) touching only coordinates present in both.
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let mut result = 0.0;
        let mut i = 0;
        let mut j = 0;

        while i < self.indices.len() && j < other.indices.len() {
            let a = self.indices[i];
            let b = other.indices[j];

            if a == b {
                result += self.values[i] * other.values[j];
                i += 1;
                j += 1;
            } else if a < b {
                i += 1;
            } else {
                j += 1;
            }
        }

        result
    }

    /// Multiply every stored value by a factor
    pub fn scale(&mut self, factor: f64) {
        for value in &mut self.values {
            *value *= factor;
        }
    }

    /// One past the highest stored index (0 for an empty vector)
    pub fn dim(&self) -> usize {
        self.indices.last().map_or(0, |&i| i + 1)
    }

    /// Compute squared L2 norm
    pub fn norm_squared(&self) -> f64 {
        self.values.iter().map(|&v| v * v).sum()
    }

    /// Compute L2 norm
    pub fn norm(&self) -> f64 {
        self.norm_squared().sqrt()
    }

    /// Number of non-zero elements
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    /// Check if vector is empty
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Dense coordinate-indexed vector used for the weight vector
#[derive(Clone, Debug, PartialEq)]
pub struct DenseVector {
    values: Vec<f64>,
}

impl DenseVector {
    /// Create a zero vector of the given dimension
    pub fn zeros(dim: usize) -> Self {
        Self {
            values: vec![0.0; dim],
        }
    }

    /// Number of stored coordinates
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the vector has no coordinates
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get the value at a coordinate (0 beyond the stored length)
    pub fn get(&self, index: usize) -> f64 {
        self.values.get(index).copied().unwrap_or(0.0)
    }

    /// Dot product against a sparse vector; coordinates beyond the stored
    /// length contribute zero.
    pub fn dot_sparse(&self, x: &SparseVector) -> f64 {
        x.indices
            .iter()
            .zip(x.values.iter())
            .map(|(&i, &v)| self.get(i) * v)
            .sum()
    }

    /// In place, add `scale * value` at every coordinate present in `x`.
    /// Grows (zero-filled) when `x` carries indices beyond the current length.
    pub fn add_scaled(&mut self, x: &SparseVector, scale: f64) {
        if x.dim() > self.values.len() {
            self.values.resize(x.dim(), 0.0);
        }
        for (&i, &v) in x.indices.iter().zip(x.values.iter()) {
            self.values[i] += scale * v;
        }
    }

    /// Multiply every coordinate by a factor
    pub fn scale(&mut self, factor: f64) {
        for value in &mut self.values {
            *value *= factor;
        }
    }

    /// Squared L2 norm
    pub fn norm_squared(&self) -> f64 {
        self.values.iter().map(|&v| v * v).sum()
    }

    /// View the coordinates as a slice
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

/// Training sample with features and label
#[derive(Clone, Debug)]
pub struct Sample {
    /// Feature vector (sparse representation)
    pub features: SparseVector,
    /// Class label (+1 or -1 for binary classification)
    pub label: f64,
}

impl Sample {
    /// Create a new sample
    pub fn new(features: SparseVector, label: f64) -> Self {
        Self { features, label }
    }
}

/// Bias-term handling, fixed at model construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BiasPolicy {
    /// No bias term
    None,
    /// Bias term present, excluded from regularization
    Unregularized,
    /// Bias term present and subject to L2 regularization
    Regularized,
}

impl BiasPolicy {
    /// Whether a bias term exists at all
    pub fn enabled(&self) -> bool {
        !matches!(self, BiasPolicy::None)
    }

    /// Whether the bias term is shrunk by the regularizer
    pub fn regularized(&self) -> bool {
        matches!(self, BiasPolicy::Regularized)
    }

    /// Stable name, used by persistence
    pub fn name(&self) -> &'static str {
        match self {
            BiasPolicy::None => "none",
            BiasPolicy::Unregularized => "unregularized",
            BiasPolicy::Regularized => "regularized",
        }
    }

    /// Look a policy up by its `name()`
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "none" => Some(BiasPolicy::None),
            "unregularized" => Some(BiasPolicy::Unregularized),
            "regularized" => Some(BiasPolicy::Regularized),
            _ => None,
        }
    }
}

/// Configuration for the SGD trainer.
///
/// All switches are fixed for the model's lifetime; there is no runtime
/// mutation of the loss function or bias handling.
#[derive(Debug, Clone, Copy)]
pub struct SgdConfig {
    /// L2 regularization strength
    pub lambda: f64,
    /// Initial learning rate; `None` requests one-shot calibration before
    /// the first training pass
    pub eta0: Option<f64>,
    /// Loss function driving the per-example update
    pub loss: LossKind,
    /// Bias term handling
    pub bias: BiasPolicy,
}

impl Default for SgdConfig {
    fn default() -> Self {
        Self {
            lambda: 1e-4,
            eta0: None,
            loss: LossKind::Log,
            bias: BiasPolicy::Unregularized,
        }
    }
}
