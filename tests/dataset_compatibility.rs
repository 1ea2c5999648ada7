//! Dataset format interoperability tests
//!
//! The same examples must survive round trips through the LibSVM text
//! format, the native binary format, and the in-memory container.

use sgdsvm::core::{Dataset, SparseVector};
use sgdsvm::data::{
    load_binary, load_libsvm, save_binary, save_libsvm, SvmDataset,
};
use std::io::Write;
use tempfile::NamedTempFile;

fn assert_datasets_equal(a: &SvmDataset, b: &SvmDataset) {
    assert_eq!(a.len(), b.len());
    assert_eq!(a.dim(), b.dim());
    assert_eq!(a.positive(), b.positive());
    assert_eq!(a.negative(), b.negative());
    for i in 0..a.len() {
        assert_eq!(a.feature(i), b.feature(i), "feature {i} differs");
        assert_eq!(a.label(i), b.label(i), "label {i} differs");
    }
}

fn mixed_dataset() -> SvmDataset {
    let mut data = SvmDataset::new();
    data.add(SparseVector::new(vec![0, 2, 9], vec![0.5, -1.25, 3.0]), 1.0)
        .unwrap();
    data.add(SparseVector::new(vec![1], vec![2.5]), -1.0).unwrap();
    data.add(SparseVector::new(vec![], vec![]), -1.0).unwrap();
    data.add(SparseVector::new(vec![4, 5], vec![0.125, -0.75]), 1.0)
        .unwrap();
    data
}

#[test]
fn test_binary_file_round_trip() {
    let data = mixed_dataset();

    let file = NamedTempFile::new().expect("Failed to create temp file");
    save_binary(&data, file.path()).expect("Save should succeed");
    let reloaded = load_binary(file.path()).expect("Load should succeed");

    assert_datasets_equal(&data, &reloaded);
}

#[test]
fn test_libsvm_file_round_trip() {
    let data = mixed_dataset();

    let file = NamedTempFile::new().expect("Failed to create temp file");
    save_libsvm(&data, file.path()).expect("Save should succeed");
    let reloaded = load_libsvm(file.path()).expect("Load should succeed");

    assert_datasets_equal(&data, &reloaded);
}

#[test]
fn test_text_to_binary_to_text() {
    let mut text_file = NamedTempFile::new().expect("Failed to create temp file");
    writeln!(text_file, "+1 1:0.5 3:1.25 10:3.0").expect("Failed to write");
    writeln!(text_file, "-1 2:2.5").expect("Failed to write");
    writeln!(text_file, "+1 5:0.125 6:-0.75").expect("Failed to write");
    text_file.flush().expect("Failed to flush");

    let from_text = load_libsvm(text_file.path()).expect("Load should succeed");

    let binary_file = NamedTempFile::new().expect("Failed to create temp file");
    save_binary(&from_text, binary_file.path()).expect("Save should succeed");
    let from_binary = load_binary(binary_file.path()).expect("Load should succeed");
    assert_datasets_equal(&from_text, &from_binary);

    let text_file2 = NamedTempFile::new().expect("Failed to create temp file");
    save_libsvm(&from_binary, text_file2.path()).expect("Save should succeed");
    let back_to_text = load_libsvm(text_file2.path()).expect("Load should succeed");
    assert_datasets_equal(&from_text, &back_to_text);
}

#[test]
fn test_formats_agree_on_training_outcome() {
    use sgdsvm::api::Trainer;

    let mut data = SvmDataset::new();
    for _ in 0..10 {
        data.add(SparseVector::new(vec![0], vec![1.5]), 1.0).unwrap();
        data.add(SparseVector::new(vec![0], vec![-1.5]), -1.0).unwrap();
    }

    let binary_file = NamedTempFile::new().expect("Failed to create temp file");
    save_binary(&data, binary_file.path()).expect("Save should succeed");
    let text_file = NamedTempFile::new().expect("Failed to create temp file");
    save_libsvm(&data, text_file.path()).expect("Save should succeed");

    let train = |d: &SvmDataset| {
        let mut trainer = Trainer::new(d.dim(), 1e-4).unwrap();
        for _ in 0..3 {
            trainer.epoch(d).unwrap();
        }
        trainer.weights()
    };

    let from_binary = load_binary(binary_file.path()).unwrap();
    let from_text = load_libsvm(text_file.path()).unwrap();
    assert_eq!(train(&from_binary), train(&from_text));
}

#[test]
fn test_relabeled_dataset_round_trips() {
    let mut data = mixed_dataset();
    data.relabel(0, -1.0).unwrap();

    let file = NamedTempFile::new().expect("Failed to create temp file");
    save_binary(&data, file.path()).expect("Save should succeed");
    let reloaded = load_binary(file.path()).expect("Load should succeed");

    assert_eq!(reloaded.label(0), -1.0);
    assert_datasets_equal(&data, &reloaded);
}
