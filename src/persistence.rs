//! Model serialization and persistence
//!
//! Persists the final dense weights and bias of a trained model, not the
//! optimizer state: a loaded model can score and predict but not resume
//! training. The weight layout matches the exported contract, `dim`
//! coordinates followed by the bias term.

use crate::api::Trainer;
use crate::core::{BiasPolicy, Dataset, Prediction, Result, SparseVector, SvmError};
use crate::loss::{Loss, LossKind};
use crate::solver::Evaluation;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Serializable representation of a trained linear model
#[derive(Serialize, Deserialize)]
pub struct SerializableModel {
    /// Dense weight coordinates (length = dimension)
    pub weights: Vec<f64>,
    /// Bias term
    pub bias: f64,
    /// Loss function name the model was trained with
    pub loss: String,
    /// Bias handling the model was built with
    pub bias_policy: String,
    /// L2 regularization strength
    pub lambda: f64,
    /// Initial learning rate in effect (calibrated or supplied)
    pub eta0: f64,
    /// Model metadata
    pub metadata: ModelMetadata,
}

/// Model metadata for tracking and validation
#[derive(Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Library version used to create the model
    pub library_version: String,
    /// Feature dimension
    pub dim: usize,
    /// Creation timestamp
    pub created_at: String,
}

impl SerializableModel {
    /// Capture the final weights of a trained model.
    ///
    /// Takes the trainer mutably because the export renormalizes the
    /// internal weight representation first.
    pub fn from_trainer(trainer: &mut Trainer) -> Self {
        let dim = trainer.dim();
        let mut weights = trainer.weights();
        let bias = weights.pop().unwrap_or(0.0);

        Self {
            weights,
            bias,
            loss: trainer.model().loss_kind().name().to_string(),
            bias_policy: trainer.model().bias_policy().name().to_string(),
            lambda: trainer.model().lambda(),
            eta0: trainer.model().eta0(),
            metadata: ModelMetadata {
                library_version: env!("CARGO_PKG_VERSION").to_string(),
                dim,
                created_at: chrono::Utc::now().to_rfc3339(),
            },
        }
    }

    /// Save model to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path).map_err(SvmError::IoError)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| SvmError::SerializationError(e.to_string()))?;
        Ok(())
    }

    /// Load model from file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path).map_err(SvmError::IoError)?;
        let reader = BufReader::new(file);
        let model: Self = serde_json::from_reader(reader)
            .map_err(|e| SvmError::SerializationError(e.to_string()))?;
        model.validate()?;
        Ok(model)
    }

    /// Check internal consistency after loading
    pub fn validate(&self) -> Result<()> {
        if self.weights.len() != self.metadata.dim {
            return Err(SvmError::SerializationError(format!(
                "weight count {} does not match dimension {}",
                self.weights.len(),
                self.metadata.dim
            )));
        }
        if LossKind::from_name(&self.loss).is_none() {
            return Err(SvmError::SerializationError(format!(
                "unknown loss function: {}",
                self.loss
            )));
        }
        if BiasPolicy::from_name(&self.bias_policy).is_none() {
            return Err(SvmError::SerializationError(format!(
                "unknown bias policy: {}",
                self.bias_policy
            )));
        }
        Ok(())
    }

    /// Evaluate the stored model over a dataset: average loss, regularized
    /// cost, and misclassification rate.
    pub fn evaluate<D: Dataset>(&self, data: &D) -> Result<Evaluation> {
        if data.is_empty() {
            return Err(SvmError::EmptyDataset);
        }
        self.validate()?;
        let loss_kind = LossKind::from_name(&self.loss).ok_or_else(|| {
            SvmError::SerializationError(format!("unknown loss function: {}", self.loss))
        })?;
        let bias_policy = BiasPolicy::from_name(&self.bias_policy).ok_or_else(|| {
            SvmError::SerializationError(format!("unknown bias policy: {}", self.bias_policy))
        })?;

        let mut loss = 0.0;
        let mut nerr = 0.0;
        for i in 0..data.len() {
            let s = self.score(data.feature(i));
            let y = data.label(i);
            loss += loss_kind.loss(s, y);
            if s * y <= 0.0 {
                nerr += 1.0;
            }
        }
        let n = data.len() as f64;
        loss /= n;
        nerr /= n;

        let mut wnorm: f64 = self.weights.iter().map(|&w| w * w).sum();
        if bias_policy.regularized() {
            wnorm += self.bias * self.bias;
        }
        Ok(Evaluation {
            loss,
            cost: loss + 0.5 * self.lambda * wnorm,
            error_rate: nerr,
        })
    }

    /// Decision score of a feature vector against the stored weights
    pub fn score(&self, x: &SparseVector) -> f64 {
        x.indices
            .iter()
            .zip(x.values.iter())
            .map(|(&i, &v)| self.weights.get(i).copied().unwrap_or(0.0) * v)
            .sum::<f64>()
            + self.bias
    }

    /// Predict the label of a feature vector
    pub fn predict(&self, x: &SparseVector) -> Prediction {
        let decision_value = self.score(x);
        let label = if decision_value >= 0.0 { 1.0 } else { -1.0 };
        Prediction::new(label, decision_value)
    }

    /// Print model summary
    pub fn print_summary(&self) {
        println!("=== Linear SVM Model Summary ===");
        println!("Loss: {}", self.loss);
        println!("Bias: {} ({:.6})", self.bias_policy, self.bias);
        println!("Lambda: {}", self.lambda);
        println!("Eta0: {}", self.eta0);
        println!("Dimension: {}", self.metadata.dim);
        println!("Library Version: {}", self.metadata.library_version);
        println!("Created: {}", self.metadata.created_at);
    }
}
