//! Schema types for observations, recommendations, and history records.

use crate::error::{AdvisorError, Result};
use crate::rules::{normalize_crop, CropRule};
use chrono::{DateTime, FixedOffset, Local, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Current schema version for records in `history.json`.
pub const HISTORY_SCHEMA_VERSION: u32 = 1;

/// Wall-clock time attached to a recommendation.
pub type Timestamp = DateTime<FixedOffset>;

/// Local time truncated to whole seconds.
pub fn now_timestamp() -> Timestamp {
    let now = Local::now();
    now.with_nanosecond(0).unwrap_or(now).into()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Nutrient {
    Nitrogen,
    Phosphorus,
    Potassium,
}

impl Nutrient {
    /// All tracked nutrients in N, P, K order.
    pub const ALL: [Nutrient; 3] = [Nutrient::Nitrogen, Nutrient::Phosphorus, Nutrient::Potassium];

    /// Return the stable string identifier used in JSON artifacts.
    pub fn as_str(&self) -> &'static str {
        match self {
            Nutrient::Nitrogen => "nitrogen",
            Nutrient::Phosphorus => "phosphorus",
            Nutrient::Potassium => "potassium",
        }
    }

    /// Single-letter symbol used in summaries.
    pub fn symbol(&self) -> &'static str {
        match self {
            Nutrient::Nitrogen => "N",
            Nutrient::Phosphorus => "P",
            Nutrient::Potassium => "K",
        }
    }
}

impl fmt::Display for Nutrient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-supplied measurements for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Normalized (trimmed, lower-cased) crop name.
    pub crop: String,
    pub ph: f64,
    pub n: f64,
    pub p: f64,
    pub k: f64,
    /// Expected annual rainfall in millimetres.
    pub rainfall: f64,
}

impl Observation {
    /// Validate raw measurements and build an observation.
    pub fn new(crop: &str, ph: f64, n: f64, p: f64, k: f64, rainfall: f64) -> Result<Self> {
        let crop = normalize_crop(crop);
        if crop.is_empty() {
            return Err(AdvisorError::InvalidInput(
                "crop must be non-empty".to_string(),
            ));
        }
        let named = [("ph", ph), ("n", n), ("p", p), ("k", k), ("rainfall", rainfall)];
        for (name, value) in named {
            if !value.is_finite() {
                return Err(AdvisorError::InvalidInput(format!(
                    "{name} must be a finite number (got {value})"
                )));
            }
            if value < 0.0 {
                return Err(AdvisorError::InvalidInput(format!(
                    "{name} must not be negative (got {value})"
                )));
            }
        }
        if ph > 14.0 {
            return Err(AdvisorError::InvalidInput(format!(
                "ph must be between 0 and 14 (got {ph})"
            )));
        }
        // Values are non-negative here; `abs` only clears the sign of -0.0.
        Ok(Self {
            crop,
            ph: ph.abs(),
            n: n.abs(),
            p: p.abs(),
            k: k.abs(),
            rainfall: rainfall.abs(),
        })
    }

    /// Measured soil level for a nutrient.
    pub fn level(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::Nitrogen => self.n,
            Nutrient::Phosphorus => self.p,
            Nutrient::Potassium => self.k,
        }
    }
}

/// Where the observed pH sits relative to the crop's ideal range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhStatus {
    Low,
    Ok,
    High,
}

/// Rainfall band relative to the global thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RainfallBand {
    Low,
    Moderate,
    High,
}

/// Deterministic output of the estimator for one observation and rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    pub ph_status: PhStatus,
    pub rainfall_band: RainfallBand,
    /// Ideal minus measured, never negative.
    pub deltas: BTreeMap<Nutrient, f64>,
    /// Application rate after the low-soil boost.
    pub npk_estimate: BTreeMap<Nutrient, u32>,
    pub messages: Vec<String>,
    pub tips: Vec<String>,
    pub explain: String,
}

/// One advisory run: observation, matched rule, and the derived estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub schema_version: u32,
    pub timestamp: Timestamp,
    pub observation: Observation,
    pub matched_rule: CropRule,
    #[serde(flatten)]
    pub estimate: Estimate,
}

impl Recommendation {
    pub fn new(
        observation: Observation,
        matched_rule: CropRule,
        estimate: Estimate,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            schema_version: HISTORY_SCHEMA_VERSION,
            timestamp,
            observation,
            matched_rule,
            estimate,
        }
    }

    pub fn crop(&self) -> &str {
        &self.observation.crop
    }
}
