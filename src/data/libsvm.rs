//! LibSVM text format
//!
//! One example per line:
//! label index:value index:value ...
//!
//! Example:
//! +1 1:0.5 3:1.2 7:0.8
//! -1 2:0.3 5:2.1
//!
//! Indices are 1-based in the file and converted to 0-based in memory.
//! Labels must be exactly +1 or -1; anything else fails the load.

use crate::core::{Dataset, Result, Sample, SparseVector, SvmError};
use crate::data::SvmDataset;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Load a dataset from a LibSVM format file
pub fn load_libsvm<P: AsRef<Path>>(path: P) -> Result<SvmDataset> {
    let file = File::open(path).map_err(SvmError::IoError)?;
    read_libsvm(BufReader::new(file))
}

/// Load a dataset from a reader (for testing and flexibility)
pub fn read_libsvm<R: BufRead>(reader: R) -> Result<SvmDataset> {
    let mut data = SvmDataset::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line.map_err(SvmError::IoError)?;
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let sample = parse_line(line).map_err(|e| {
            SvmError::ParseError(format!("error parsing line {}: {}", line_num + 1, e))
        })?;
        data.add(sample.features, sample.label).map_err(|e| {
            SvmError::ParseError(format!("error parsing line {}: {}", line_num + 1, e))
        })?;
    }

    if data.is_empty() {
        return Err(SvmError::EmptyDataset);
    }

    Ok(data)
}

/// Save a dataset to a LibSVM format file
pub fn save_libsvm<P: AsRef<Path>, D: Dataset>(data: &D, path: P) -> Result<()> {
    let file = File::create(path).map_err(SvmError::IoError)?;
    write_libsvm(data, BufWriter::new(file))
}

/// Write a dataset in LibSVM format
pub fn write_libsvm<W: Write, D: Dataset>(data: &D, mut writer: W) -> Result<()> {
    for i in 0..data.len() {
        let label = if data.label(i) > 0.0 { "+1" } else { "-1" };
        write!(writer, "{label}")?;
        let x = data.feature(i);
        for (&index, &value) in x.indices.iter().zip(x.values.iter()) {
            write!(writer, " {}:{}", index + 1, value)?;
        }
        writeln!(writer)?;
    }
    writer.flush()?;
    Ok(())
}

/// Parse a single line in libsvm format
fn parse_line(line: &str) -> Result<Sample> {
    let parts: Vec<&str> = line.split_whitespace().collect();

    if parts.is_empty() {
        return Err(SvmError::ParseError("empty line".to_string()));
    }

    let label = parts[0]
        .parse::<f64>()
        .map_err(|_| SvmError::ParseError(format!("invalid label: {}", parts[0])))?;

    let mut indices = Vec::new();
    let mut values = Vec::new();

    for feature_str in &parts[1..] {
        let (index_str, value_str) = feature_str.split_once(':').ok_or_else(|| {
            SvmError::ParseError(format!("invalid feature format: {feature_str}"))
        })?;

        let index = index_str
            .parse::<i32>()
            .map_err(|_| SvmError::ParseError(format!("invalid feature index: {index_str}")))?;
        let value = value_str
            .parse::<f64>()
            .map_err(|_| SvmError::ParseError(format!("invalid feature value: {value_str}")))?;

        indices.push(index);
        values.push(value);
    }

    let features = SparseVector::from_one_based(&indices, &values)?;
    Ok(Sample::new(features, label))
}
