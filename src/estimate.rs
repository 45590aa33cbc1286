//! Rule-based nutrient estimate.
//!
//! Everything here is a pure function of the observation, the matched rule,
//! and the global thresholds: no clock, no I/O, no randomness.
use crate::rules::{CropRule, PhRange, Thresholds, Tip, TipCondition};
use crate::schema::{Estimate, Nutrient, Observation, PhStatus, RainfallBand};
use std::collections::BTreeMap;

/// Method note carried into every report.
pub const EXPLAIN: &str =
    "Rule-based estimate using base crop needs + simple thresholds. Verify with local soil test.";

/// Largest boost applied to the base need when soil is depleted.
const MAX_LOW_SOIL_BOOST: f64 = 0.30;

/// Compute the estimate for one observation against its matched rule.
pub fn estimate(observation: &Observation, rule: &CropRule, thresholds: &Thresholds) -> Estimate {
    let ph_status = ph_status(observation.ph, &rule.ph_range);
    let rainfall_band = rainfall_band(observation.rainfall, thresholds);

    let mut deltas = BTreeMap::new();
    let mut npk_estimate = BTreeMap::new();
    for nutrient in Nutrient::ALL {
        let supplied = observation.level(nutrient);
        let ideal = rule.ideal(nutrient);
        deltas.insert(nutrient, nutrient_delta(ideal, supplied));
        npk_estimate.insert(
            nutrient,
            application_rate(ideal, supplied, thresholds.low(nutrient)),
        );
    }

    let mut messages = vec![ph_message(observation, ph_status)];
    for nutrient in Nutrient::ALL {
        if is_low(observation, thresholds, nutrient) {
            messages.push(low_nutrient_message(nutrient).to_string());
        }
    }

    let conditions = Conditions {
        ph_status,
        rainfall_band,
        observation,
        thresholds,
    };
    let mut tips: Vec<String> = rule
        .tips
        .iter()
        .filter(|tip| conditions.allows(tip))
        .map(|tip| render_tip(tip.text(), observation))
        .collect();
    tips.push(rainfall_tip(rainfall_band).to_string());

    Estimate {
        ph_status,
        rainfall_band,
        deltas,
        npk_estimate,
        messages,
        tips,
        explain: EXPLAIN.to_string(),
    }
}

/// Ideal minus supplied, clamped at zero and rounded to two decimals.
pub fn nutrient_delta(ideal: f64, supplied: f64) -> f64 {
    let delta = ideal - supplied;
    if delta > 0.0 {
        round2(delta)
    } else {
        0.0
    }
}

/// Base need, boosted by up to 30% in proportion to how far soil sits below
/// the low threshold.
pub fn application_rate(base: f64, supplied: f64, low_threshold: f64) -> u32 {
    if supplied >= low_threshold {
        return base.round() as u32;
    }
    let severity = ((low_threshold - supplied) / low_threshold.max(1e-6)).clamp(0.0, 1.0);
    (base * (1.0 + MAX_LOW_SOIL_BOOST * severity)).round() as u32
}

pub fn ph_status(ph: f64, range: &PhRange) -> PhStatus {
    if ph < range.min {
        PhStatus::Low
    } else if ph > range.max {
        PhStatus::High
    } else {
        PhStatus::Ok
    }
}

pub fn rainfall_band(rainfall: f64, thresholds: &Thresholds) -> RainfallBand {
    if rainfall < thresholds.low_rainfall_mm {
        RainfallBand::Low
    } else if rainfall > thresholds.high_rainfall_mm {
        RainfallBand::High
    } else {
        RainfallBand::Moderate
    }
}

/// Substitute `{crop}`, `{ph}`, and `{rainfall}` in a tip template.
pub fn render_tip(template: &str, observation: &Observation) -> String {
    template
        .replace("{crop}", &observation.crop)
        .replace("{ph}", &format!("{:.1}", observation.ph))
        .replace("{rainfall}", &format!("{:.0}", observation.rainfall))
}

struct Conditions<'a> {
    ph_status: PhStatus,
    rainfall_band: RainfallBand,
    observation: &'a Observation,
    thresholds: &'a Thresholds,
}

impl Conditions<'_> {
    fn allows(&self, tip: &Tip) -> bool {
        match tip.condition() {
            Some(condition) => self.holds(condition),
            None => true,
        }
    }

    fn holds(&self, condition: TipCondition) -> bool {
        match condition {
            TipCondition::PhLow => self.ph_status == PhStatus::Low,
            TipCondition::PhHigh => self.ph_status == PhStatus::High,
            TipCondition::PhOk => self.ph_status == PhStatus::Ok,
            TipCondition::RainfallLow => self.rainfall_band == RainfallBand::Low,
            TipCondition::RainfallHigh => self.rainfall_band == RainfallBand::High,
            TipCondition::RainfallModerate => self.rainfall_band == RainfallBand::Moderate,
            TipCondition::NLow => is_low(self.observation, self.thresholds, Nutrient::Nitrogen),
            TipCondition::PLow => is_low(self.observation, self.thresholds, Nutrient::Phosphorus),
            TipCondition::KLow => is_low(self.observation, self.thresholds, Nutrient::Potassium),
        }
    }
}

fn is_low(observation: &Observation, thresholds: &Thresholds, nutrient: Nutrient) -> bool {
    observation.level(nutrient) < thresholds.low(nutrient)
}

fn ph_message(observation: &Observation, status: PhStatus) -> String {
    let ph = observation.ph;
    let crop = &observation.crop;
    match status {
        PhStatus::Low => format!(
            "Soil pH ({ph:.1}) is LOW for {crop}. Consider liming (after soil test)."
        ),
        PhStatus::High => format!(
            "Soil pH ({ph:.1}) is HIGH for {crop}. Consider organic matter / sulfur guidance (after soil test)."
        ),
        PhStatus::Ok => format!("Soil pH ({ph:.1}) is within ideal range for {crop}."),
    }
}

fn low_nutrient_message(nutrient: Nutrient) -> &'static str {
    match nutrient {
        Nutrient::Nitrogen => "Nitrogen looks low: expect weaker growth if not corrected.",
        Nutrient::Phosphorus => "Phosphorus looks low: root development may be limited.",
        Nutrient::Potassium => "Potassium looks low: stress tolerance and quality may drop.",
    }
}

fn rainfall_tip(band: RainfallBand) -> &'static str {
    match band {
        RainfallBand::Low => {
            "Rainfall is low: plan irrigation, mulching, or drought-tolerant practices."
        }
        RainfallBand::High => "High rainfall: ensure drainage and monitor fungal disease risk.",
        RainfallBand::Moderate => "Rainfall seems moderate: keep basic moisture monitoring.",
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
#[path = "estimate_tests.rs"]
mod tests;
