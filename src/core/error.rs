//! Error types for SGD-SVM training

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SvmError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid label: expected -1 or +1, got {0}")]
    InvalidLabel(f64),

    #[error("Index out of range: {index} (dataset has {len} examples)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Invalid range: [{imin}, {imax}]")]
    InvalidRange { imin: usize, imax: usize },

    #[error("Learning rate not calibrated: call determine_eta0 or supply eta0 > 0")]
    UncalibratedLearningRate,

    #[error("Empty dataset")]
    EmptyDataset,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type Result<T> = std::result::Result<T, SvmError>;
