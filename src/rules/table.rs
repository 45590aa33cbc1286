//! Immutable crop rule table built once per run.
use super::{CropEntry, CropRule, PhRange, RulesFile, Thresholds};
use crate::error::{AdvisorError, Result};
use std::collections::BTreeMap;

const PH_SCALE_MAX: f64 = 14.0;
/// Largest accepted base need; keeps boosted application rates well inside `u32`.
const BASE_NPK_MAX: f64 = 10_000.0;

/// Validated rules keyed by lower-cased crop name.
#[derive(Debug, Clone)]
pub struct RulesTable {
    origin: String,
    crops: BTreeMap<String, CropRule>,
    thresholds: Thresholds,
}

impl RulesTable {
    /// Validate a parsed rules document and normalize crop keys.
    pub fn from_file(file: RulesFile, origin: &str) -> Result<Self> {
        let invalid = |reason: String| AdvisorError::InvalidRules {
            origin: origin.to_string(),
            reason,
        };

        if file.crops.is_empty() {
            return Err(invalid("no crops defined".to_string()));
        }
        validate_thresholds(&file.thresholds).map_err(invalid)?;

        let mut crops = BTreeMap::new();
        for (name, entry) in file.crops {
            let key = normalize_crop(&name);
            if key.is_empty() {
                return Err(invalid("crop names must be non-empty".to_string()));
            }
            let rule = crop_rule(&key, entry).map_err(invalid)?;
            if crops.insert(key.clone(), rule).is_some() {
                return Err(invalid(format!(
                    "duplicate crop {key:?} (crop names are case-insensitive)"
                )));
            }
        }

        Ok(Self {
            origin: origin.to_string(),
            crops,
            thresholds: file.thresholds,
        })
    }

    /// Return the rule for `crop`, matching case-insensitively.
    pub fn lookup(&self, crop: &str) -> Result<&CropRule> {
        self.crops
            .get(&normalize_crop(crop))
            .ok_or_else(|| AdvisorError::UnknownCrop {
                crop: crop.trim().to_string(),
                known: self.list_crops().into_iter().map(str::to_string).collect(),
            })
    }

    /// Sorted crop keys.
    pub fn list_crops(&self) -> Vec<&str> {
        self.crops.keys().map(String::as_str).collect()
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Where the table was loaded from (a path or `<built-in>`).
    pub fn origin(&self) -> &str {
        &self.origin
    }
}

/// Canonical form used for crop keys and lookups.
pub fn normalize_crop(name: &str) -> String {
    name.trim().to_lowercase()
}

fn crop_rule(key: &str, entry: CropEntry) -> std::result::Result<CropRule, String> {
    let [min, max] = entry.ideal_ph;
    if !(min.is_finite() && max.is_finite()) || min < 0.0 || max > PH_SCALE_MAX {
        return Err(format!(
            "{key}: ideal_ph must lie within 0-{PH_SCALE_MAX} (got [{min}, {max}])"
        ));
    }
    if min > max {
        return Err(format!(
            "{key}: ideal_ph min {min} exceeds max {max}"
        ));
    }
    for value in entry.base_npk {
        if !value.is_finite() || value < 0.0 {
            return Err(format!(
                "{key}: base_npk values must be non-negative numbers (got {value})"
            ));
        }
        if value > BASE_NPK_MAX {
            return Err(format!(
                "{key}: base_npk values must not exceed {BASE_NPK_MAX} (got {value})"
            ));
        }
    }
    if let Some(tip) = entry.notes.iter().find(|tip| tip.text().trim().is_empty()) {
        return Err(format!("{key}: empty tip text {tip:?}"));
    }
    let [n_ideal, p_ideal, k_ideal] = entry.base_npk;
    Ok(CropRule {
        crop: key.to_string(),
        ph_range: PhRange { min, max },
        n_ideal,
        p_ideal,
        k_ideal,
        tips: entry.notes,
    })
}

fn validate_thresholds(thresholds: &Thresholds) -> std::result::Result<(), String> {
    let named = [
        ("low_rainfall_mm", thresholds.low_rainfall_mm),
        ("high_rainfall_mm", thresholds.high_rainfall_mm),
        ("low_n", thresholds.low_n),
        ("low_p", thresholds.low_p),
        ("low_k", thresholds.low_k),
    ];
    for (name, value) in named {
        if !value.is_finite() || value < 0.0 {
            return Err(format!(
                "thresholds.{name} must be a non-negative number (got {value})"
            ));
        }
    }
    if thresholds.low_rainfall_mm > thresholds.high_rainfall_mm {
        return Err(format!(
            "thresholds.low_rainfall_mm {} exceeds high_rainfall_mm {}",
            thresholds.low_rainfall_mm, thresholds.high_rainfall_mm
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
