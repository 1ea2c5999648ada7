//! Online training of a linear binary SVM with stochastic gradient descent
//!
//! The classifier learns from sparse, high-dimensional feature vectors one
//! example at a time. L2 regularization is applied through a lazily scaled
//! weight representation, so every update touches only the active
//! coordinates of the example. The initial learning rate is either supplied
//! or calibrated automatically by a line search over one-pass training cost.

pub mod api;
pub mod core;
pub mod data;
pub mod ffi;
pub mod loss;
pub mod persistence;
pub mod solver;

// Re-export main types for convenience
pub use crate::api::{quick, Trainer};
pub use crate::core::traits::*;
pub use crate::core::types::*;
pub use crate::core::{Result, SvmError};
pub use crate::data::{load_binary, load_libsvm, save_binary, save_libsvm, SvmDataset};
pub use crate::loss::{Loss, LossKind};
pub use crate::persistence::SerializableModel;
pub use crate::solver::{Evaluation, SgdClassifier};

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
