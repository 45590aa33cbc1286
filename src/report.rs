//! Plain-text rendering of a recommendation.
//!
//! The saved report and the console summary share one fixed template; the
//! report adds a disclaimer footer.
use crate::schema::{Nutrient, Recommendation};
use chrono::SecondsFormat;

/// Title line of every saved report.
pub const REPORT_TITLE: &str = "AGRO ADVISORY (rule-based)";
/// Closing line of every saved report.
pub const DISCLAIMER: &str =
    "Disclaimer: Prototype advice only. Confirm with local agronomist/soil test.";

const RULE_WIDTH: usize = 45;

/// Render the report written to `recommendation_<crop>_<timestamp>.txt`.
pub fn render_report(recommendation: &Recommendation) -> String {
    let mut out = String::new();
    push_line(&mut out, REPORT_TITLE);
    push_line(&mut out, &"-".repeat(RULE_WIDTH));
    push_body(&mut out, recommendation);
    push_line(&mut out, "");
    push_line(&mut out, DISCLAIMER);
    out
}

/// Render the summary printed to stdout after a run.
pub fn render_summary(recommendation: &Recommendation) -> String {
    let mut out = String::new();
    push_line(&mut out, "=== AGRO ADVISORY RESULT ===");
    push_body(&mut out, recommendation);
    out
}

/// One-line rendering of the observation.
pub fn format_inputs(recommendation: &Recommendation) -> String {
    let observation = &recommendation.observation;
    format!(
        "pH={:.2} N={:.2} P={:.2} K={:.2} rainfall={:.0} mm",
        observation.ph, observation.n, observation.p, observation.k, observation.rainfall
    )
}

/// `N=<n> P=<p> K=<k>` from the application estimate.
pub fn format_npk(recommendation: &Recommendation) -> String {
    Nutrient::ALL
        .iter()
        .map(|nutrient| {
            let value = recommendation
                .estimate
                .npk_estimate
                .get(nutrient)
                .copied()
                .unwrap_or_default();
            format!("{}={}", nutrient.symbol(), value)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn push_body(out: &mut String, recommendation: &Recommendation) {
    let rule = &recommendation.matched_rule;
    let estimate = &recommendation.estimate;

    push_line(out, &format!("Crop: {}", recommendation.crop()));
    push_line(
        out,
        &format!(
            "Generated: {}",
            recommendation
                .timestamp
                .to_rfc3339_opts(SecondsFormat::Secs, false)
        ),
    );
    push_line(out, &format!("Inputs: {}", format_inputs(recommendation)));
    push_line(
        out,
        &format!(
            "Ideal pH range: {:.1}-{:.1}",
            rule.ph_range.min, rule.ph_range.max
        ),
    );
    push_line(out, "");

    push_line(
        out,
        "Nutrient adjustments (ideal - measured, never negative):",
    );
    for nutrient in Nutrient::ALL {
        let delta = estimate.deltas.get(&nutrient).copied().unwrap_or_default();
        push_line(out, &format!("- {nutrient}: +{delta:.2}"));
    }
    push_line(out, "");

    push_line(
        out,
        &format!("Estimated NPK recommendation: {}", format_npk(recommendation)),
    );
    push_line(out, &estimate.explain);
    push_line(out, "");

    push_list(out, "Messages:", &estimate.messages);
    push_line(out, "");
    push_list(out, "Tips:", &estimate.tips);
}

fn push_list(out: &mut String, heading: &str, items: &[String]) {
    push_line(out, heading);
    if items.is_empty() {
        push_line(out, "- None.");
        return;
    }
    for item in items {
        push_line(out, &format!("- {item}"));
    }
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
