//! Append-only run history.
//!
//! The log is a JSON array of objects. Existing entries are carried forward
//! verbatim, so records written by older schema versions survive untouched.
use crate::error::{AdvisorError, Result};
use crate::schema::Recommendation;
use crate::staging::write_atomic;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// One history entry as stored on disk.
pub type HistoryRecord = Map<String, Value>;

/// Ordered history records, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryLog {
    records: Vec<HistoryRecord>,
}

impl HistoryLog {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }
}

/// Return a new log with `record` appended after every existing entry.
pub fn append_record(log: HistoryLog, record: &Recommendation) -> Result<HistoryLog> {
    let value = serde_json::to_value(record)
        .and_then(serde_json::from_value::<HistoryRecord>)
        .map_err(|err| AdvisorError::io("serialize history record", err.into()))?;
    let mut records = log.records;
    records.push(value);
    Ok(HistoryLog { records })
}

/// Read the log at `path`; a missing or blank file is an empty log.
pub fn load_history(path: &Path) -> Result<HistoryLog> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(HistoryLog::default()),
        Err(err) => return Err(AdvisorError::io(format!("read {}", path.display()), err)),
    };
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(HistoryLog::default());
    }
    serde_json::from_slice(&bytes).map_err(|source| AdvisorError::CorruptHistory {
        path: path.to_path_buf(),
        source,
    })
}

/// Replace the log at `path` atomically.
pub fn write_history(path: &Path, log: &HistoryLog) -> Result<()> {
    let mut text = serde_json::to_string_pretty(log)
        .map_err(|err| AdvisorError::io("serialize history log", err.into()))?;
    text.push('\n');
    write_atomic(path, text.as_bytes())
}

/// Load, append, and rewrite the log; returns the new length.
pub fn append_history(path: &Path, record: &Recommendation) -> Result<usize> {
    let log = load_history(path)?;
    let log = append_record(log, record)?;
    write_history(path, &log)?;
    tracing::debug!(path = %path.display(), records = log.len(), "history appended");
    Ok(log.len())
}

#[cfg(test)]
#[path = "history_tests.rs"]
mod tests;
