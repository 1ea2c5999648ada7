//! Solver for the linear SVM
//!
//! A single solver is provided: plain stochastic gradient descent with lazy
//! L2 shrinkage and an adaptive initial-learning-rate search.

pub mod sgd;

pub use self::sgd::*;
