//! Stochastic gradient descent for the linear SVM
//!
//! The classifier keeps the weight vector in unscaled form `w` together with
//! a scalar `w_divisor`; the effective weights are always `w / w_divisor`.
//! The L2 shrinkage `w *= (1 - eta*lambda)` every step would cost O(dim), so
//! it is applied lazily as an O(1) divisor update instead, and the loss-term
//! update compensates by the current divisor. The divisor is folded back into
//! `w` whenever it exceeds [`DIVISOR_RENORM_THRESHOLD`], which bounds the
//! magnitude drift of the stored components.

use crate::core::{BiasPolicy, Dataset, DenseVector, Result, SgdConfig, SparseVector, SvmError};
use crate::loss::{Loss, LossKind};
use log::{debug, warn};

/// Renormalize once the lazy divisor grows past this
const DIVISOR_RENORM_THRESHOLD: f64 = 1e5;

/// The bias term moves with a much smaller learning rate than the weights
const BIAS_LEARNING_RATE_FACTOR: f64 = 0.01;

/// Multiplicative step of the initial-learning-rate search
const ETA_SEARCH_FACTOR: f64 = 2.0;

/// Cap on search steps per direction. 64 halvings reach rates far below
/// anything useful, so the cap only fires on non-unimodal cost surfaces.
const MAX_ETA_SEARCH_STEPS: usize = 64;

/// Averaged evaluation over an example range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    /// Average loss over the range
    pub loss: f64,
    /// Average loss plus the regularization term `0.5 * lambda * wnorm()`
    pub cost: f64,
    /// Misclassification rate as a fraction in [0, 1]
    pub error_rate: f64,
}

impl Evaluation {
    /// Misclassification rate rescaled to percent
    pub fn error_percent(&self) -> f64 {
        100.0 * self.error_rate
    }
}

/// Linear binary classifier trained online by SGD.
///
/// One caller thread owns the model for its lifetime; all operations are
/// synchronous and blocking. Cloning takes a full snapshot of the state,
/// which is how [`evaluate_eta`](SgdClassifier::evaluate_eta) probes
/// hypothetical learning rates without touching the live model.
#[derive(Debug, Clone)]
pub struct SgdClassifier {
    w: DenseVector,
    w_bias: f64,
    w_divisor: f64,
    lambda: f64,
    eta0: f64,
    t: f64,
    dim: usize,
    loss: LossKind,
    bias: BiasPolicy,
}

impl SgdClassifier {
    /// Create an untrained classifier for `dim` features.
    ///
    /// When `config.eta0` is `None` the learning rate must be calibrated with
    /// [`determine_eta0`](SgdClassifier::determine_eta0) before training.
    pub fn new(dim: usize, config: &SgdConfig) -> Result<Self> {
        if !(config.lambda > 0.0 && config.lambda.is_finite()) {
            return Err(SvmError::InvalidParameter(format!(
                "lambda must be positive and finite, got {}",
                config.lambda
            )));
        }
        let eta0 = match config.eta0 {
            Some(eta0) if eta0 > 0.0 && eta0.is_finite() => eta0,
            Some(eta0) => {
                return Err(SvmError::InvalidParameter(format!(
                    "eta0 must be positive and finite, got {eta0}"
                )))
            }
            None => 0.0,
        };

        Ok(Self {
            w: DenseVector::zeros(dim),
            w_bias: 0.0,
            w_divisor: 1.0,
            lambda: config.lambda,
            eta0,
            t: 0.0,
            dim,
            loss: config.loss,
            bias: config.bias,
        })
    }

    /// Fold the lazy divisor back into the stored weights.
    ///
    /// Never changes the effective weight vector, only its representation.
    pub fn renorm(&mut self) {
        if self.w_divisor != 1.0 {
            self.w.scale(1.0 / self.w_divisor);
            self.w_divisor = 1.0;
        }
    }

    /// Squared norm of the effective weight vector, including the bias term
    /// when it is regularized. Used in cost reporting only.
    pub fn wnorm(&self) -> f64 {
        let mut norm = self.w.norm_squared() / self.w_divisor / self.w_divisor;
        if self.bias.regularized() {
            norm += self.w_bias * self.w_bias;
        }
        norm
    }

    /// Raw decision score for a feature vector
    pub fn score(&self, x: &SparseVector) -> f64 {
        self.w.dot_sparse(x) / self.w_divisor + self.w_bias
    }

    /// Raw score for one example; optionally accumulates loss and a
    /// misclassification indicator into the supplied running sums.
    ///
    /// A score with `s * y <= 0` counts as a misclassification, including
    /// an exactly-zero score.
    pub fn test_one(
        &self,
        x: &SparseVector,
        y: f64,
        loss_acc: Option<&mut f64>,
        err_acc: Option<&mut f64>,
    ) -> f64 {
        let s = self.score(x);
        if let Some(acc) = loss_acc {
            *acc += self.loss.loss(s, y);
        }
        if let Some(acc) = err_acc {
            if s * y <= 0.0 {
                *acc += 1.0;
            }
        }
        s
    }

    /// One SGD step at the given learning rate.
    pub fn train_one(&mut self, x: &SparseVector, y: f64, eta: f64) {
        let s = self.score(x);
        // regularization term, applied lazily through the divisor
        self.w_divisor /= 1.0 - eta * self.lambda;
        if self.w_divisor > DIVISOR_RENORM_THRESHOLD {
            self.renorm();
        }
        // loss term; the divisor factor makes the effective update exactly
        // eta * d * x
        let d = self.loss.dloss(s, y);
        if d != 0.0 {
            self.w.add_scaled(x, eta * d * self.w_divisor);
        }
        if self.bias.enabled() {
            let etab = eta * BIAS_LEARNING_RATE_FACTOR;
            if self.bias.regularized() {
                self.w_bias *= 1.0 - etab * self.lambda;
            }
            self.w_bias += etab * d;
        }
    }

    /// Train over the inclusive example range `[imin, imax]`.
    ///
    /// The learning rate decays as `eta0 / (1 + lambda*eta0*t)` where `t`
    /// counts examples across every call; it never resets between epochs.
    pub fn train_range<D: Dataset>(&mut self, imin: usize, imax: usize, data: &D) -> Result<()> {
        check_range(imin, imax, data)?;
        if self.eta0 <= 0.0 {
            return Err(SvmError::UncalibratedLearningRate);
        }
        debug!("training on [{imin}, {imax}]");
        for i in imin..=imax {
            let eta = self.eta0 / (1.0 + self.lambda * self.eta0 * self.t);
            self.train_one(data.feature(i), data.label(i), eta);
            self.t += 1.0;
        }
        Ok(())
    }

    /// Evaluate over the inclusive example range `[imin, imax]` without
    /// mutating any state.
    pub fn test_range<D: Dataset>(&self, imin: usize, imax: usize, data: &D) -> Result<Evaluation> {
        check_range(imin, imax, data)?;
        let mut loss = 0.0;
        let mut nerr = 0.0;
        for i in imin..=imax {
            self.test_one(data.feature(i), data.label(i), Some(&mut loss), Some(&mut nerr));
        }
        let n = (imax - imin + 1) as f64;
        loss /= n;
        nerr /= n;
        Ok(Evaluation {
            loss,
            cost: loss + 0.5 * self.lambda * self.wnorm(),
            error_rate: nerr,
        })
    }

    /// Cost of one training pass over `[imin, imax]` at the fixed rate `eta`.
    ///
    /// Runs on a throwaway deep copy of the model state; the live model is
    /// never mutated.
    pub fn evaluate_eta<D: Dataset>(
        &self,
        imin: usize,
        imax: usize,
        data: &D,
        eta: f64,
    ) -> Result<f64> {
        check_range(imin, imax, data)?;
        let mut probe = self.clone();
        for i in imin..=imax {
            probe.train_one(data.feature(i), data.label(i), eta);
        }
        let mut loss = 0.0;
        for i in imin..=imax {
            probe.test_one(data.feature(i), data.label(i), Some(&mut loss), None);
        }
        loss /= (imax - imin + 1) as f64;
        let cost = loss + 0.5 * self.lambda * probe.wnorm();
        debug!("trying eta={eta} yields cost {cost}");
        Ok(cost)
    }

    /// One-shot calibration of the initial learning rate.
    ///
    /// Starting from `eta = 1`, probes rates by factors of two in whichever
    /// direction lowers the one-pass cost, and stops at the first rate that
    /// no longer improves. Each direction is bounded by
    /// [`MAX_ETA_SEARCH_STEPS`]; hitting the bound keeps the rate the search
    /// had reached. Expected to run once, before the first training pass.
    pub fn determine_eta0<D: Dataset>(
        &mut self,
        imin: usize,
        imax: usize,
        data: &D,
    ) -> Result<f64> {
        let factor = ETA_SEARCH_FACTOR;
        let mut lo_eta = 1.0;
        let mut lo_cost = self.evaluate_eta(imin, imax, data, lo_eta)?;
        let mut hi_eta = lo_eta * factor;
        let mut hi_cost = self.evaluate_eta(imin, imax, data, hi_eta)?;

        if lo_cost < hi_cost {
            let mut steps = 0;
            while lo_cost < hi_cost {
                if steps >= MAX_ETA_SEARCH_STEPS {
                    warn!(
                        "learning-rate search still descending after {MAX_ETA_SEARCH_STEPS} \
                         halvings, settling on eta0={lo_eta}"
                    );
                    break;
                }
                hi_eta = lo_eta;
                hi_cost = lo_cost;
                lo_eta = hi_eta / factor;
                lo_cost = self.evaluate_eta(imin, imax, data, lo_eta)?;
                steps += 1;
            }
        } else if hi_cost < lo_cost {
            let mut steps = 0;
            while hi_cost < lo_cost {
                if steps >= MAX_ETA_SEARCH_STEPS {
                    warn!(
                        "learning-rate search still descending after {MAX_ETA_SEARCH_STEPS} \
                         doublings, settling on eta0={lo_eta}"
                    );
                    break;
                }
                lo_eta = hi_eta;
                lo_cost = hi_cost;
                hi_eta = lo_eta * factor;
                hi_cost = self.evaluate_eta(imin, imax, data, hi_eta)?;
                steps += 1;
            }
        }

        self.eta0 = lo_eta;
        debug!("using eta0={}", self.eta0);
        Ok(self.eta0)
    }

    /// Export the dense weights: `dim` coordinates followed by the bias term
    /// as the final element.
    ///
    /// Renormalizes first so the exported values are directly usable without
    /// the internal scaling factor.
    pub fn export_weights(&mut self) -> Vec<f64> {
        self.renorm();
        let mut weights: Vec<f64> = (0..self.dim).map(|i| self.w.get(i)).collect();
        weights.push(self.w_bias);
        weights
    }

    /// Feature dimension fixed at construction
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Current bias term
    pub fn bias(&self) -> f64 {
        self.w_bias
    }

    /// Regularization strength
    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// Initial learning rate; 0 while uncalibrated
    pub fn eta0(&self) -> f64 {
        self.eta0
    }

    /// Whether a usable learning rate is in place
    pub fn is_calibrated(&self) -> bool {
        self.eta0 > 0.0
    }

    /// Examples seen across all training calls
    pub fn examples_seen(&self) -> f64 {
        self.t
    }

    /// Loss function bound at construction
    pub fn loss_kind(&self) -> LossKind {
        self.loss
    }

    /// Bias handling bound at construction
    pub fn bias_policy(&self) -> BiasPolicy {
        self.bias
    }
}

fn check_range<D: Dataset>(imin: usize, imax: usize, data: &D) -> Result<()> {
    if imin > imax {
        return Err(SvmError::InvalidRange { imin, imax });
    }
    if imax >= data.len() {
        return Err(SvmError::IndexOutOfRange {
            index: imax,
            len: data.len(),
        });
    }
    Ok(())
}
