//! Native binary dataset format
//!
//! Layout, in host byte order (deliberately not portable across
//! heterogeneous machines):
//!
//! - example count: i32
//! - per example:
//!   - each stored coordinate as (i32 index, f64 value), indices 0-based
//!     and strictly increasing
//!   - an i32 sentinel (-1) terminating the coordinate list
//!   - the label as f64 (+1 or -1)
//!
//! The reader treats any negative index as the terminator, so the reserved
//! sentinel can never collide with real data: feature indices are validated
//! non-negative on both paths.

use crate::core::{Dataset, Result, SparseVector, SvmError};
use crate::data::SvmDataset;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

const SENTINEL: i32 = -1;

/// Load a dataset from a binary format file
pub fn load_binary<P: AsRef<Path>>(path: P) -> Result<SvmDataset> {
    let file = File::open(path).map_err(SvmError::IoError)?;
    read_binary(BufReader::new(file))
}

/// Read a dataset from a binary stream
pub fn read_binary<R: Read>(mut reader: R) -> Result<SvmDataset> {
    let count = read_i32(&mut reader)?;
    if count < 0 {
        return Err(SvmError::SerializationError(format!(
            "negative example count: {count}"
        )));
    }

    let mut data = SvmDataset::new();
    for _ in 0..count {
        let mut indices = Vec::new();
        let mut values = Vec::new();
        loop {
            let index = read_i32(&mut reader)?;
            if index < 0 {
                break;
            }
            indices.push(index as usize);
            values.push(read_f64(&mut reader)?);
        }
        let label = read_f64(&mut reader)?;
        data.add(SparseVector::new(indices, values), label)?;
    }

    if data.is_empty() {
        return Err(SvmError::EmptyDataset);
    }

    Ok(data)
}

/// Save a dataset to a binary format file
pub fn save_binary<P: AsRef<Path>, D: Dataset>(data: &D, path: P) -> Result<()> {
    let file = File::create(path).map_err(SvmError::IoError)?;
    write_binary(data, BufWriter::new(file))
}

/// Write a dataset to a binary stream
pub fn write_binary<W: Write, D: Dataset>(data: &D, mut writer: W) -> Result<()> {
    let count = i32::try_from(data.len()).map_err(|_| {
        SvmError::SerializationError(format!("dataset too large for binary format: {}", data.len()))
    })?;
    writer.write_all(&count.to_ne_bytes())?;

    for i in 0..data.len() {
        let x = data.feature(i);
        for (&index, &value) in x.indices.iter().zip(x.values.iter()) {
            let index = i32::try_from(index).map_err(|_| {
                SvmError::SerializationError(format!(
                    "feature index too large for binary format: {index}"
                ))
            })?;
            writer.write_all(&index.to_ne_bytes())?;
            writer.write_all(&value.to_ne_bytes())?;
        }
        writer.write_all(&SENTINEL.to_ne_bytes())?;
        writer.write_all(&data.label(i).to_ne_bytes())?;
    }

    writer.flush()?;
    Ok(())
}

fn read_i32<R: Read>(reader: &mut R) -> Result<i32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(i32::from_ne_bytes(buf))
}

fn read_f64<R: Read>(reader: &mut R) -> Result<f64> {
    let mut buf = [0u8; 8];
    reader.read_exact(&mut buf)?;
    Ok(f64::from_ne_bytes(buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_dataset() -> SvmDataset {
        let mut data = SvmDataset::new();
        data.add(SparseVector::new(vec![0, 2, 7], vec![0.5, -1.2, 3.0]), 1.0)
            .unwrap();
        data.add(SparseVector::new(vec![1], vec![2.5]), -1.0).unwrap();
        data.add(SparseVector::new(vec![], vec![]), 1.0).unwrap();
        data
    }

    #[test]
    fn test_round_trip_in_memory() {
        let data = sample_dataset();

        let mut bytes = Vec::new();
        write_binary(&data, &mut bytes).unwrap();
        let reloaded = read_binary(bytes.as_slice()).unwrap();

        assert_eq!(reloaded.len(), data.len());
        assert_eq!(reloaded.dim(), data.dim());
        assert_eq!(reloaded.positive(), data.positive());
        assert_eq!(reloaded.negative(), data.negative());
        for i in 0..data.len() {
            assert_eq!(reloaded.feature(i), data.feature(i));
            assert_eq!(reloaded.label(i), data.label(i));
        }
    }

    #[test]
    fn test_wire_layout() {
        let mut data = SvmDataset::new();
        data.add(SparseVector::new(vec![3], vec![1.5]), -1.0).unwrap();

        let mut bytes = Vec::new();
        write_binary(&data, &mut bytes).unwrap();

        // count + (index, value) + sentinel + label
        assert_eq!(bytes.len(), 4 + (4 + 8) + 4 + 8);
        assert_eq!(i32::from_ne_bytes(bytes[0..4].try_into().unwrap()), 1);
        assert_eq!(i32::from_ne_bytes(bytes[4..8].try_into().unwrap()), 3);
        assert_eq!(f64::from_ne_bytes(bytes[8..16].try_into().unwrap()), 1.5);
        assert_eq!(
            i32::from_ne_bytes(bytes[16..20].try_into().unwrap()),
            SENTINEL
        );
        assert_eq!(f64::from_ne_bytes(bytes[20..28].try_into().unwrap()), -1.0);
    }

    #[test]
    fn test_read_rejects_negative_count() {
        let bytes = (-3i32).to_ne_bytes();
        let result = read_binary(bytes.as_slice());
        assert!(matches!(result, Err(SvmError::SerializationError(_))));
    }

    #[test]
    fn test_read_rejects_bad_label() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1i32.to_ne_bytes());
        bytes.extend_from_slice(&SENTINEL.to_ne_bytes());
        bytes.extend_from_slice(&0.25f64.to_ne_bytes());

        let result = read_binary(bytes.as_slice());
        assert!(matches!(result, Err(SvmError::InvalidLabel(_))));
    }

    #[test]
    fn test_read_truncated_stream() {
        let data = sample_dataset();
        let mut bytes = Vec::new();
        write_binary(&data, &mut bytes).unwrap();

        bytes.truncate(bytes.len() - 3);
        let result = read_binary(bytes.as_slice());
        assert!(matches!(result, Err(SvmError::IoError(_))));
    }

    #[test]
    fn test_read_empty_dataset() {
        let bytes = 0i32.to_ne_bytes();
        let result = read_binary(bytes.as_slice());
        assert!(matches!(result, Err(SvmError::EmptyDataset)));
    }

    #[test]
    fn test_file_round_trip() {
        use tempfile::NamedTempFile;

        let data = sample_dataset();
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");

        save_binary(&data, temp_file.path()).unwrap();
        let reloaded = load_binary(temp_file.path()).unwrap();

        assert_eq!(reloaded.len(), data.len());
        for i in 0..data.len() {
            assert_eq!(reloaded.feature(i), data.feature(i));
            assert_eq!(reloaded.label(i), data.label(i));
        }
    }
}
