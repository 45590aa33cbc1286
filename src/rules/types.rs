//! Serde types for the rules resource and the in-memory crop rule.
//!
//! `RulesFile` mirrors the JSON on disk; `CropRule` is the normalized,
//! validated form the estimator consumes and the history log records.
use crate::schema::Nutrient;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top-level rules JSON document.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RulesFile {
    pub crops: BTreeMap<String, CropEntry>,
    pub thresholds: Thresholds,
}

/// Per-crop entry as written in the rules file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CropEntry {
    /// Ideal soil pH as `[min, max]`.
    pub ideal_ph: [f64; 2],
    /// Baseline crop need as `[n, p, k]`.
    pub base_npk: [f64; 3],
    #[serde(default)]
    pub notes: Vec<Tip>,
}

/// Global thresholds shared by every crop.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Thresholds {
    pub low_rainfall_mm: f64,
    pub high_rainfall_mm: f64,
    pub low_n: f64,
    pub low_p: f64,
    pub low_k: f64,
}

impl Thresholds {
    /// Soil level below which a nutrient is reported as low.
    pub fn low(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::Nitrogen => self.low_n,
            Nutrient::Phosphorus => self.low_p,
            Nutrient::Potassium => self.low_k,
        }
    }
}

/// Inclusive pH window.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct PhRange {
    pub min: f64,
    pub max: f64,
}

/// Observation features a tip can be conditioned on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TipCondition {
    PhLow,
    PhHigh,
    PhOk,
    RainfallLow,
    RainfallHigh,
    RainfallModerate,
    NLow,
    PLow,
    KLow,
}

/// Tip template attached to a crop.
///
/// Plain strings always apply; the object form applies only when its
/// condition holds for the observation.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Tip {
    Always(String),
    When { when: TipCondition, text: String },
}

impl Tip {
    /// Template text with `{crop}`, `{ph}`, `{rainfall}` placeholders.
    pub fn text(&self) -> &str {
        match self {
            Tip::Always(text) => text,
            Tip::When { text, .. } => text,
        }
    }

    /// Gating condition, if any.
    pub fn condition(&self) -> Option<TipCondition> {
        match self {
            Tip::Always(_) => None,
            Tip::When { when, .. } => Some(*when),
        }
    }
}

/// Validated rule for a single crop.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CropRule {
    pub crop: String,
    pub ph_range: PhRange,
    pub n_ideal: f64,
    pub p_ideal: f64,
    pub k_ideal: f64,
    pub tips: Vec<Tip>,
}

impl CropRule {
    /// Ideal (baseline) level for a nutrient.
    pub fn ideal(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::Nitrogen => self.n_ideal,
            Nutrient::Phosphorus => self.p_ideal,
            Nutrient::Potassium => self.k_ideal,
        }
    }
}
