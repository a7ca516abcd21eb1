//! JSON record loading for the two input feeds.
//!
//! Structural problems (unreadable file, invalid JSON, a top-level value
//! that is not an array) are fatal. Individual records are returned as raw
//! [`serde_json::Value`]s and validated later by the normalizer.

use std::io::Read;
use std::path::Path;

use health_core::error::{HealthError, Result};
use serde_json::Value;
use tracing::debug;

/// Load a JSON array of records from `path`.
pub fn load_records(path: &Path) -> Result<Vec<Value>> {
    let content = std::fs::read_to_string(path).map_err(|source| HealthError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let records = parse_records(&content).map_err(|err| match err {
        HealthError::NotARecordList { .. } => HealthError::NotARecordList {
            path: path.to_path_buf(),
        },
        other => other,
    })?;

    debug!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Read a JSON array of records from any byte stream.
pub fn read_records<R: Read>(mut reader: R) -> Result<Vec<Value>> {
    let mut content = String::new();
    reader.read_to_string(&mut content)?;
    parse_records(&content)
}

fn parse_records(content: &str) -> Result<Vec<Value>> {
    match serde_json::from_str::<Value>(content)? {
        Value::Array(records) => Ok(records),
        _ => Err(HealthError::NotARecordList {
            path: "<stream>".into(),
        }),
    }
}
