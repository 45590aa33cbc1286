//! Rule-based crop nutrient advisory.
//!
//! A run is a straight pipeline: validate the observation, look up the crop
//! rule, estimate adjustments, render the report, and persist it alongside
//! the run history.
pub mod cli;
pub mod error;
pub mod estimate;
pub mod persist;
pub mod report;
pub mod rules;
pub mod schema;
pub mod staging;
pub mod util;

use crate::error::Result;
use crate::persist::{OutputPaths, SavedOutputs};
use crate::rules::RulesTable;
use crate::schema::{Observation, Recommendation, Timestamp};

/// Build the recommendation for one observation.
///
/// Fails with `UnknownCrop` before anything is written.
pub fn advise(
    rules: &RulesTable,
    observation: Observation,
    timestamp: Timestamp,
) -> Result<Recommendation> {
    let rule = rules.lookup(&observation.crop)?;
    tracing::debug!(crop = %rule.crop, "rule matched");
    let estimate = estimate::estimate(&observation, rule, rules.thresholds());
    Ok(Recommendation::new(
        observation,
        rule.clone(),
        estimate,
        timestamp,
    ))
}

/// Render the report and persist it with a history entry.
pub fn save_recommendation(
    out_dir: &std::path::Path,
    recommendation: &Recommendation,
) -> Result<SavedOutputs> {
    let paths = OutputPaths::new(out_dir.to_path_buf());
    let text = report::render_report(recommendation);
    persist::save(&paths, recommendation, &text)
}
