//! Run persistence: the history log and per-run report files.
//!
//! The report is written first and removed again if the history append
//! fails, so a failed run never leaves an orphan report behind and never
//! damages the existing history.
mod history;
mod paths;
mod report_file;

pub use history::{
    append_history, append_record, load_history, write_history, HistoryLog, HistoryRecord,
};
pub use paths::{OutputPaths, DEFAULT_OUT_DIR};
pub use report_file::write_report;

use crate::error::Result;
use crate::schema::Recommendation;
use crate::staging::rollback_created;
use std::path::PathBuf;

/// Files produced by a successful save.
#[derive(Debug, Clone)]
pub struct SavedOutputs {
    pub report_path: PathBuf,
    pub history_path: PathBuf,
    pub history_len: usize,
}

/// Write the report file and append the record to the history log.
pub fn save(
    paths: &OutputPaths,
    recommendation: &Recommendation,
    report_text: &str,
) -> Result<SavedOutputs> {
    let report_path = write_report(paths, recommendation, report_text)?;
    let history_path = paths.history_path();
    let history_len = match append_history(&history_path, recommendation) {
        Ok(len) => len,
        Err(err) => {
            rollback_created(std::slice::from_ref(&report_path));
            return Err(err);
        }
    };
    tracing::info!(
        report = %report_path.display(),
        history = %history_path.display(),
        records = history_len,
        "outputs saved"
    );
    Ok(SavedOutputs {
        report_path,
        history_path,
        history_len,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdvisorError;
    use crate::estimate::estimate;
    use crate::rules::{parse_rules, BUILTIN_ORIGIN, BUILTIN_RULES_JSON};
    use crate::schema::Observation;
    use chrono::DateTime;

    fn maize_recommendation() -> Recommendation {
        let table = parse_rules(BUILTIN_RULES_JSON, BUILTIN_ORIGIN).expect("parse built-in rules");
        let rule = table.lookup("maize").expect("maize rule");
        let observation =
            Observation::new("maize", 6.2, 30.0, 10.0, 70.0, 650.0).expect("valid observation");
        let estimate = estimate(&observation, rule, table.thresholds());
        let timestamp =
            DateTime::parse_from_rfc3339("2024-05-01T09:30:00+03:00").expect("parse timestamp");
        Recommendation::new(observation, rule.clone(), estimate, timestamp)
    }

    #[test]
    fn save_twice_in_same_second_keeps_both_reports() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let paths = OutputPaths::new(dir.path().join("outputs"));
        let recommendation = maize_recommendation();

        let first = save(&paths, &recommendation, "first").expect("first save");
        let second = save(&paths, &recommendation, "second").expect("second save");

        assert_ne!(first.report_path, second.report_path);
        assert_eq!(
            second
                .report_path
                .file_name()
                .and_then(|name| name.to_str()),
            Some("recommendation_maize_20240501_093000_2.txt")
        );
        assert_eq!(
            std::fs::read_to_string(&first.report_path).expect("read first"),
            "first"
        );
        assert_eq!(second.history_len, 2);
        assert_eq!(load_history(&paths.history_path()).expect("load").len(), 2);
    }

    #[test]
    fn failed_history_append_removes_new_report() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let paths = OutputPaths::new(dir.path().to_path_buf());
        std::fs::write(paths.history_path(), "not json").expect("write corrupt history");

        let err = save(&paths, &maize_recommendation(), "report").expect_err("corrupt history");
        assert!(matches!(err, AdvisorError::CorruptHistory { .. }), "{err:?}");

        let remaining: Vec<_> = std::fs::read_dir(dir.path())
            .expect("list outputs")
            .map(|entry| entry.expect("dir entry").file_name())
            .collect();
        assert_eq!(remaining, vec![std::ffi::OsString::from("history.json")]);
        assert_eq!(
            std::fs::read_to_string(paths.history_path()).expect("read history"),
            "not json"
        );
    }
}
