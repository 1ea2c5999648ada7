//! Integration tests for the CLI application
//!
//! These tests verify that the CLI commands work correctly with real data files.

use std::io::Write;
use std::process::Command;
use tempfile::{NamedTempFile, TempDir};

/// Helper to create test data files
struct TestDataFiles {
    pub libsvm_file: NamedTempFile,
    pub test_libsvm_file: NamedTempFile,
}

impl TestDataFiles {
    fn new() -> std::io::Result<Self> {
        // Create LibSVM training data
        let mut libsvm_file = NamedTempFile::new()?;
        writeln!(libsvm_file, "+1 1:2.0 2:1.0")?;
        writeln!(libsvm_file, "-1 1:-2.0 2:-1.0")?;
        writeln!(libsvm_file, "+1 1:1.5 2:0.8")?;
        writeln!(libsvm_file, "-1 1:-1.5 2:-0.8")?;
        writeln!(libsvm_file, "+1 1:1.8 2:0.9")?;
        writeln!(libsvm_file, "-1 1:-1.8 2:-0.9")?;
        libsvm_file.flush()?;

        // Create LibSVM test data
        let mut test_libsvm_file = NamedTempFile::new()?;
        writeln!(test_libsvm_file, "+1 1:1.6 2:0.7")?;
        writeln!(test_libsvm_file, "-1 1:-1.6 2:-0.7")?;
        test_libsvm_file.flush()?;

        Ok(TestDataFiles {
            libsvm_file,
            test_libsvm_file,
        })
    }
}

fn cli_binary() -> &'static str {
    env!("CARGO_BIN_EXE_sgdsvm")
}

fn train_model(data_path: &std::path::Path, model_path: &std::path::Path) {
    let output = Command::new(cli_binary())
        .args([
            "train",
            "--data",
            data_path.to_str().unwrap(),
            "--output",
            model_path.to_str().unwrap(),
            "--lambda",
            "1e-4",
            "--epochs",
            "10",
        ])
        .output()
        .expect("Failed to run CLI train command");

    assert!(
        output.status.success(),
        "Train command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn test_cli_train_command() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let model_path = temp_dir.path().join("model.json");

    train_model(test_data.libsvm_file.path(), &model_path);
    assert!(model_path.exists(), "Model file was not created");
}

#[test]
fn test_cli_train_with_explicit_options() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let model_path = temp_dir.path().join("model.json");

    let output = Command::new(cli_binary())
        .args([
            "train",
            "--data",
            test_data.libsvm_file.path().to_str().unwrap(),
            "--output",
            model_path.to_str().unwrap(),
            "--format",
            "libsvm",
            "--lambda",
            "1e-5",
            "--eta0",
            "0.1",
            "--epochs",
            "3",
            "--loss",
            "hinge",
            "--regularize-bias",
        ])
        .output()
        .expect("Failed to run CLI train command");

    assert!(
        output.status.success(),
        "Train command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(model_path.exists());

    let contents = std::fs::read_to_string(&model_path).expect("Failed to read model");
    assert!(contents.contains("\"hinge\""));
    assert!(contents.contains("\"regularized\""));
}

#[test]
fn test_cli_info_command() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let model_path = temp_dir.path().join("model.json");
    train_model(test_data.libsvm_file.path(), &model_path);

    let output = Command::new(cli_binary())
        .args(["info", model_path.to_str().unwrap()])
        .output()
        .expect("Failed to run CLI info command");

    assert!(
        output.status.success(),
        "Info command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Summary"));
    assert!(stdout.contains("Loss"));
    assert!(stdout.contains("Dimension"));
}

#[test]
fn test_cli_predict_command() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let model_path = temp_dir.path().join("model.json");
    train_model(test_data.libsvm_file.path(), &model_path);

    let output = Command::new(cli_binary())
        .args([
            "predict",
            "--model",
            model_path.to_str().unwrap(),
            "--data",
            test_data.test_libsvm_file.path().to_str().unwrap(),
        ])
        .output()
        .expect("Failed to run CLI predict command");

    assert!(
        output.status.success(),
        "Predict command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    let labels: Vec<&str> = stdout.lines().collect();
    assert_eq!(labels.len(), 2);
    assert_eq!(labels[0], "1");
    assert_eq!(labels[1], "-1");
}

#[test]
fn test_cli_predict_with_confidence_to_file() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let model_path = temp_dir.path().join("model.json");
    let predictions_path = temp_dir.path().join("predictions.txt");
    train_model(test_data.libsvm_file.path(), &model_path);

    let output = Command::new(cli_binary())
        .args([
            "predict",
            "--model",
            model_path.to_str().unwrap(),
            "--data",
            test_data.test_libsvm_file.path().to_str().unwrap(),
            "--output",
            predictions_path.to_str().unwrap(),
            "--confidence",
        ])
        .output()
        .expect("Failed to run CLI predict command");

    assert!(
        output.status.success(),
        "Predict command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let contents = std::fs::read_to_string(&predictions_path).expect("Failed to read predictions");
    for line in contents.lines() {
        // label and decision value per line
        assert_eq!(line.split_whitespace().count(), 2);
    }
}

#[test]
fn test_cli_evaluate_command() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let model_path = temp_dir.path().join("model.json");
    train_model(test_data.libsvm_file.path(), &model_path);

    let output = Command::new(cli_binary())
        .args([
            "evaluate",
            "--model",
            model_path.to_str().unwrap(),
            "--data",
            test_data.test_libsvm_file.path().to_str().unwrap(),
        ])
        .output()
        .expect("Failed to run CLI evaluate command");

    assert!(
        output.status.success(),
        "Evaluate command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Loss:"));
    assert!(stdout.contains("Cost:"));
    assert!(stdout.contains("Misclassification:"));
}

#[test]
fn test_cli_convert_round_trip() {
    let test_data = TestDataFiles::new().expect("Failed to create test data");
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let binary_path = temp_dir.path().join("data.bin");
    let text_path = temp_dir.path().join("data.libsvm");

    // Text to binary, detected by extension
    let output = Command::new(cli_binary())
        .args([
            "convert",
            test_data.libsvm_file.path().to_str().unwrap(),
            binary_path.to_str().unwrap(),
        ])
        .output()
        .expect("Failed to run CLI convert command");
    assert!(
        output.status.success(),
        "Convert command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(binary_path.exists());

    // Binary back to text
    let output = Command::new(cli_binary())
        .args([
            "convert",
            binary_path.to_str().unwrap(),
            text_path.to_str().unwrap(),
        ])
        .output()
        .expect("Failed to run CLI convert command");
    assert!(output.status.success());

    // Numeric formatting may differ; the parsed examples must not
    use sgdsvm::core::Dataset;
    let original = sgdsvm::data::load_libsvm(test_data.libsvm_file.path()).unwrap();
    let converted = sgdsvm::data::load_libsvm(&text_path).unwrap();
    assert_eq!(original.len(), converted.len());
    for i in 0..original.len() {
        assert_eq!(original.feature(i), converted.feature(i));
        assert_eq!(original.label(i), converted.label(i));
    }
}

#[test]
fn test_cli_error_handling_invalid_file() {
    let output = Command::new(cli_binary())
        .args([
            "train",
            "--data",
            "/non/existent/file.libsvm",
            "--output",
            "/tmp/never-written-model.json",
        ])
        .output()
        .expect("Failed to run CLI train command");

    assert!(!output.status.success());
}

#[test]
fn test_cli_rejects_bad_labels() {
    let mut bad_file = NamedTempFile::new().expect("Failed to create temp file");
    writeln!(bad_file, "2 1:1.0").expect("Failed to write");
    bad_file.flush().expect("Failed to flush");

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let model_path = temp_dir.path().join("model.json");

    let output = Command::new(cli_binary())
        .args([
            "train",
            "--data",
            bad_file.path().to_str().unwrap(),
            "--output",
            model_path.to_str().unwrap(),
        ])
        .output()
        .expect("Failed to run CLI train command");

    assert!(!output.status.success());
    assert!(!model_path.exists());
}
