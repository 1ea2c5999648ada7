//! C-callable entry points for embedding the trainer in a host application
//!
//! Thin marshalling layer over [`SvmDataset`] and [`Trainer`]; no algorithmic
//! logic lives here. Objects cross the boundary as opaque pointers created by
//! the `_new` functions and released by the matching `_free` functions.
//! Feature vectors arrive as parallel arrays of 1-based indices and values;
//! exported weights are the `dim` coordinates followed by the bias term.
//!
//! Failures at this boundary (invalid label, null pointer, training failure)
//! are caller programming errors: they are reported on stderr and abort the
//! process rather than leaving the model in an inconsistent state.

use crate::api::Trainer;
use crate::core::Dataset;
use crate::core::SparseVector;
use crate::data::SvmDataset;
use std::fmt::Display;
use std::os::raw::{c_double, c_float, c_int};
use std::process;
use std::slice;

fn die(context: &str, message: impl Display) -> ! {
    eprintln!("sgdsvm: {context}: {message}");
    process::abort();
}

unsafe fn deref<'a, T>(ptr: *const T, context: &str) -> &'a T {
    match ptr.as_ref() {
        Some(r) => r,
        None => die(context, "null pointer"),
    }
}

unsafe fn deref_mut<'a, T>(ptr: *mut T, context: &str) -> &'a mut T {
    match ptr.as_mut() {
        Some(r) => r,
        None => die(context, "null pointer"),
    }
}

/// Create an empty dataset. Release with `dataset_free`.
#[no_mangle]
pub extern "C" fn dataset_new() -> *mut SvmDataset {
    Box::into_raw(Box::new(SvmDataset::new()))
}

/// Append one example given as `n` parallel (1-based index, value) entries
/// and a label that must be exactly +1 or -1.
///
/// # Safety
/// `d` must be a live pointer from `dataset_new`; `indices` and `values`
/// must point to `n` readable elements each.
#[no_mangle]
pub unsafe extern "C" fn dataset_add(
    d: *mut SvmDataset,
    n: c_int,
    indices: *const c_int,
    values: *const c_float,
    label: c_double,
) {
    let dataset = deref_mut(d, "dataset_add");
    if n < 0 {
        die("dataset_add", format!("negative feature count: {n}"));
    }
    let n = n as usize;
    let (indices, values) = if n == 0 {
        (&[][..], &[][..])
    } else {
        (
            slice::from_raw_parts(indices, n),
            slice::from_raw_parts(values, n),
        )
    };
    let indices: Vec<i32> = indices.iter().map(|&i| i as i32).collect();
    let values: Vec<f64> = values.iter().map(|&v| v as f64).collect();

    let features = match SparseVector::from_one_based(&indices, &values) {
        Ok(x) => x,
        Err(e) => die("dataset_add", e),
    };
    if let Err(e) = dataset.add(features, label) {
        die("dataset_add", e);
    }
}

/// Maximum feature dimension observed so far.
///
/// # Safety
/// `d` must be a live pointer from `dataset_new`.
#[no_mangle]
pub unsafe extern "C" fn dataset_getdim(d: *const SvmDataset) -> c_int {
    deref(d, "dataset_getdim").dim() as c_int
}

/// Release a dataset. Passing null is a no-op.
///
/// # Safety
/// `d` must be null or a live pointer from `dataset_new`, not used again
/// after this call.
#[no_mangle]
pub unsafe extern "C" fn dataset_free(d: *mut SvmDataset) {
    if !d.is_null() {
        drop(Box::from_raw(d));
    }
}

/// Create a trainer for `dim` features with regularization `lambda`.
/// The learning rate is calibrated on the first epoch. Release with
/// `trainer_free`.
#[no_mangle]
pub extern "C" fn trainer_new(dim: c_int, lambda: c_double) -> *mut Trainer {
    if dim < 0 {
        die("trainer_new", format!("negative dimension: {dim}"));
    }
    match Trainer::new(dim as usize, lambda) {
        Ok(t) => Box::into_raw(Box::new(t)),
        Err(e) => die("trainer_new", e),
    }
}

/// One training pass over the dataset (calibrating first when needed).
///
/// # Safety
/// `t` and `d` must be live pointers from `trainer_new` / `dataset_new`.
#[no_mangle]
pub unsafe extern "C" fn trainer_epoch(t: *mut Trainer, d: *const SvmDataset) {
    let trainer = deref_mut(t, "trainer_epoch");
    let dataset = deref(d, "trainer_epoch");
    if let Err(e) = trainer.epoch(dataset) {
        die("trainer_epoch", e);
    }
}

/// Evaluate over the whole dataset: average loss, regularized cost, and
/// misclassification rate (fraction in [0, 1]) through the out pointers.
///
/// # Safety
/// `t` and `d` must be live pointers; `loss`, `cost` and `nerr` must be
/// writable.
#[no_mangle]
pub unsafe extern "C" fn trainer_evaluate(
    t: *const Trainer,
    d: *const SvmDataset,
    loss: *mut c_double,
    cost: *mut c_double,
    nerr: *mut c_double,
) {
    let trainer = deref(t, "trainer_evaluate");
    let dataset = deref(d, "trainer_evaluate");
    let metrics = match trainer.eval(dataset) {
        Ok(m) => m,
        Err(e) => die("trainer_evaluate", e),
    };
    *deref_mut(loss, "trainer_evaluate") = metrics.loss;
    *deref_mut(cost, "trainer_evaluate") = metrics.cost;
    *deref_mut(nerr, "trainer_evaluate") = metrics.error_rate;
}

/// Length of the exported weight array: dimension + 1 (bias appended).
///
/// # Safety
/// `t` must be a live pointer from `trainer_new`.
#[no_mangle]
pub unsafe extern "C" fn trainer_weightdim(t: *const Trainer) -> c_int {
    (deref(t, "trainer_weightdim").dim() + 1) as c_int
}

/// Copy the dense weights out: `dim` coordinates followed by the bias term.
///
/// # Safety
/// `t` must be a live pointer; `weights` must point to `trainer_weightdim(t)`
/// writable elements.
#[no_mangle]
pub unsafe extern "C" fn trainer_getweights(t: *mut Trainer, weights: *mut c_float) {
    let trainer = deref_mut(t, "trainer_getweights");
    let exported = trainer.weights();
    let out = slice::from_raw_parts_mut(weights, exported.len());
    for (slot, &value) in out.iter_mut().zip(exported.iter()) {
        *slot = value as c_float;
    }
}

/// Release a trainer. Passing null is a no-op.
///
/// # Safety
/// `t` must be null or a live pointer from `trainer_new`, not used again
/// after this call.
#[no_mangle]
pub unsafe extern "C" fn trainer_free(t: *mut Trainer) {
    if !t.is_null() {
        drop(Box::from_raw(t));
    }
}
