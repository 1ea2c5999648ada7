//! High-level training orchestration
//!
//! [`Trainer`] sequences the solver correctly: the initial learning rate is
//! calibrated exactly once, on a bounded prefix of the dataset, before the
//! first training pass; every epoch after that is a plain full pass.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use sgdsvm::api::Trainer;
//! use sgdsvm::core::Dataset;
//! use sgdsvm::data::load_libsvm;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = load_libsvm("train.libsvm")?;
//! let mut trainer = Trainer::new(data.dim(), 1e-5)?;
//! for _ in 0..5 {
//!     trainer.epoch(&data)?;
//! }
//! let metrics = trainer.eval(&data)?;
//! println!("error rate: {:.2}%", metrics.error_percent());
//! # Ok(())
//! # }
//! ```

use crate::core::{Dataset, Prediction, Result, SgdConfig, SparseVector, SvmError};
use crate::solver::{Evaluation, SgdClassifier};
use log::info;

/// The one-time learning-rate calibration runs on at most this many leading
/// examples; a full pass over a large dataset per probed rate would dominate
/// the cost of training itself.
const CALIBRATION_PREFIX: usize = 1000;

/// Drives epochs of SGD training over a dataset.
///
/// Owns the classifier for its lifetime. `eval` and `predict` never mutate
/// model state and may be called between epochs at any time.
pub struct Trainer {
    model: SgdClassifier,
    needs_calibration: bool,
}

impl Trainer {
    /// Create a trainer with default configuration (log loss, unregularized
    /// bias, calibrated learning rate) for `dim` features.
    pub fn new(dim: usize, lambda: f64) -> Result<Self> {
        Self::with_config(
            dim,
            SgdConfig {
                lambda,
                ..SgdConfig::default()
            },
        )
    }

    /// Create a trainer with an explicit configuration.
    ///
    /// A supplied `eta0` skips the calibration pass entirely.
    pub fn with_config(dim: usize, config: SgdConfig) -> Result<Self> {
        let needs_calibration = config.eta0.is_none();
        Ok(Self {
            model: SgdClassifier::new(dim, &config)?,
            needs_calibration,
        })
    }

    /// One full training pass over the dataset.
    ///
    /// The first call calibrates the initial learning rate on the dataset
    /// prefix before training; subsequent calls train directly.
    pub fn epoch<D: Dataset>(&mut self, data: &D) -> Result<()> {
        if data.is_empty() {
            return Err(SvmError::EmptyDataset);
        }
        let imax = data.len() - 1;
        if self.needs_calibration {
            let smax = imax.min(CALIBRATION_PREFIX);
            let eta0 = self.model.determine_eta0(0, smax, data)?;
            info!("calibrated eta0={eta0} on examples [0, {smax}]");
            self.needs_calibration = false;
        }
        self.model.train_range(0, imax, data)
    }

    /// Evaluate the model over the whole dataset
    pub fn eval<D: Dataset>(&self, data: &D) -> Result<Evaluation> {
        if data.is_empty() {
            return Err(SvmError::EmptyDataset);
        }
        self.model.test_range(0, data.len() - 1, data)
    }

    /// Predict the label of a feature vector
    pub fn predict(&self, x: &SparseVector) -> Prediction {
        let decision_value = self.model.score(x);
        let label = if decision_value >= 0.0 { 1.0 } else { -1.0 };
        Prediction::new(label, decision_value)
    }

    /// Export the dense weights: `dim` coordinates followed by the bias term.
    ///
    /// Renormalizes the internal representation first, so the returned array
    /// is directly usable by consumers.
    pub fn weights(&mut self) -> Vec<f64> {
        self.model.export_weights()
    }

    /// Feature dimension fixed at construction
    pub fn dim(&self) -> usize {
        self.model.dim()
    }

    /// Whether the next `epoch` call will calibrate first
    pub fn needs_calibration(&self) -> bool {
        self.needs_calibration
    }

    /// Access the underlying classifier
    pub fn model(&self) -> &SgdClassifier {
        &self.model
    }
}

/// Convenience functions for quick operations
pub mod quick {
    use super::*;
    use crate::data::load_libsvm;
    use std::path::Path;

    /// Train on a LibSVM file with default configuration
    pub fn train_libsvm<P: AsRef<Path>>(path: P, lambda: f64, epochs: usize) -> Result<Trainer> {
        let data = load_libsvm(path)?;
        let mut trainer = Trainer::new(data.dim(), lambda)?;
        for _ in 0..epochs {
            trainer.epoch(&data)?;
        }
        Ok(trainer)
    }

    /// Train on one LibSVM file and evaluate on another
    pub fn evaluate_split<P1: AsRef<Path>, P2: AsRef<Path>>(
        train_path: P1,
        test_path: P2,
        lambda: f64,
        epochs: usize,
    ) -> Result<Evaluation> {
        let trainer = train_libsvm(train_path, lambda, epochs)?;
        let test = load_libsvm(test_path)?;
        trainer.eval(&test)
    }
}
