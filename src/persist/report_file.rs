//! One human-readable report file per run.
use super::OutputPaths;
use crate::error::{AdvisorError, Result};
use crate::schema::Recommendation;
use crate::staging::write_new;
use std::io::{Error, ErrorKind};
use std::path::PathBuf;

/// Suffixes tried before giving up on a unique report name.
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Write `text` to a fresh `recommendation_<crop>_<stamp>.txt`.
pub fn write_report(
    paths: &OutputPaths,
    recommendation: &Recommendation,
    text: &str,
) -> Result<PathBuf> {
    for attempt in 1..=MAX_NAME_ATTEMPTS {
        let path = paths.report_path(recommendation.crop(), &recommendation.timestamp, attempt);
        if write_new(&path, text.as_bytes())? {
            tracing::debug!(path = %path.display(), "report written");
            return Ok(path);
        }
    }
    Err(AdvisorError::io(
        format!("create report in {}", paths.root().display()),
        Error::new(
            ErrorKind::AlreadyExists,
            format!("no free report name after {MAX_NAME_ATTEMPTS} attempts"),
        ),
    ))
}
