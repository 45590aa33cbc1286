//! CLI argument parsing for the advisory run.
//!
//! The CLI only collects and type-checks flags; range checks live in
//! `Observation::new` so every entry point validates the same way.
use crate::error::Result;
use crate::persist::DEFAULT_OUT_DIR;
use crate::schema::Observation;
use clap::Parser;
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "advisor",
    version,
    about = "Rule-based crop nutrient advisory",
    after_help = "Examples:\n  advisor --crop maize --ph 6.2 --n 30 --p 10 --k 70 --rainfall 650\n  advisor --crop coffee --ph 5.4 --n 45 --p 12 --k 80 --rainfall 1200 --json\n  advisor --rules my_rules.json --out-dir /tmp/advice --crop sesame --ph 7.1 --n 20 --p 9 --k 40 --rainfall 420"
)]
pub struct AdviseArgs {
    /// Crop name (matched case-insensitively against the rules table)
    #[arg(long, value_name = "NAME")]
    pub crop: String,

    /// Soil pH (0-14)
    #[arg(long, value_name = "FLOAT", value_parser = parse_measurement, allow_negative_numbers = true)]
    pub ph: f64,

    /// Soil nitrogen index
    #[arg(long, value_name = "FLOAT", value_parser = parse_measurement, allow_negative_numbers = true)]
    pub n: f64,

    /// Soil phosphorus index
    #[arg(long, value_name = "FLOAT", value_parser = parse_measurement, allow_negative_numbers = true)]
    pub p: f64,

    /// Soil potassium index
    #[arg(long, value_name = "FLOAT", value_parser = parse_measurement, allow_negative_numbers = true)]
    pub k: f64,

    /// Expected annual rainfall in millimetres
    #[arg(long, value_name = "FLOAT", value_parser = parse_measurement, allow_negative_numbers = true)]
    pub rainfall: f64,

    /// Rules JSON file (defaults to the built-in table)
    #[arg(long, value_name = "PATH")]
    pub rules: Option<PathBuf>,

    /// Directory for history.json and report files
    #[arg(long, value_name = "DIR", default_value = DEFAULT_OUT_DIR)]
    pub out_dir: PathBuf,

    /// Print the recommendation as JSON instead of the text summary
    #[arg(long)]
    pub json: bool,

    /// Skip writing the report file and history entry
    #[arg(long)]
    pub no_save: bool,

    /// Emit debug logging to stderr
    #[arg(long)]
    pub verbose: bool,
}

impl AdviseArgs {
    /// Validate the measurement flags into an observation.
    pub fn observation(&self) -> Result<Observation> {
        Observation::new(&self.crop, self.ph, self.n, self.p, self.k, self.rainfall)
    }
}

/// Parse a finite decimal measurement.
fn parse_measurement(raw: &str) -> std::result::Result<f64, String> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("{raw:?} is not a number"))?;
    if !value.is_finite() {
        return Err(format!("{raw:?} is not a finite number"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdvisorError;

    const REQUIRED: [&str; 13] = [
        "advisor", "--crop", "maize", "--ph", "6.2", "--n", "30", "--p", "10", "--k", "70",
        "--rainfall", "650",
    ];

    fn parse(extra: &[&str]) -> std::result::Result<AdviseArgs, clap::Error> {
        AdviseArgs::try_parse_from(REQUIRED.iter().chain(extra.iter()))
    }

    #[test]
    fn parses_required_flags_with_defaults() {
        let args = parse(&[]).expect("parse args");
        assert_eq!(args.crop, "maize");
        assert_eq!(args.rainfall, 650.0);
        assert_eq!(args.out_dir, PathBuf::from("outputs"));
        assert!(args.rules.is_none());
        assert!(!args.json && !args.no_save && !args.verbose);
        let observation = args.observation().expect("valid observation");
        assert_eq!(observation.k, 70.0);
    }

    #[test]
    fn missing_crop_is_invalid_input() {
        let argv = REQUIRED
            .iter()
            .enumerate()
            .filter(|(index, _)| !matches!(index, 1 | 2))
            .map(|(_, arg)| *arg);
        let err = AdviseArgs::try_parse_from(argv).expect_err("missing --crop");
        let err = AdvisorError::from(err);
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("--crop"), "{err}");
    }

    #[test]
    fn rejects_non_numeric_and_non_finite_values() {
        for bad in ["abc", "NaN", "inf", ""] {
            let argv = [
                "advisor", "--crop", "maize", "--ph", bad, "--n", "30", "--p", "10", "--k",
                "70", "--rainfall", "650",
            ];
            let err = AdviseArgs::try_parse_from(argv).expect_err("bad --ph");
            assert!(
                matches!(AdvisorError::from(err), AdvisorError::InvalidInput(_)),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn negative_values_parse_then_fail_validation() {
        let argv = [
            "advisor", "--crop", "maize", "--ph", "6.2", "--n", "-3", "--p", "10", "--k", "70",
            "--rainfall", "650",
        ];
        let args = AdviseArgs::try_parse_from(argv).expect("negative numbers parse");
        let err = args.observation().expect_err("negative nitrogen");
        assert!(err.to_string().contains("n must not be negative"), "{err}");
    }

    #[test]
    fn optional_flags_override_defaults() {
        let args = parse(&["--rules", "r.json", "--out-dir", "/tmp/x", "--json", "--no-save"])
            .expect("parse args");
        assert_eq!(args.rules, Some(PathBuf::from("r.json")));
        assert_eq!(args.out_dir, PathBuf::from("/tmp/x"));
        assert!(args.json && args.no_save);
    }
}
