use agro_advisor::cli::AdviseArgs;
use agro_advisor::error::AdvisorError;
use agro_advisor::util::display_path;
use agro_advisor::{advise, report, rules, save_recommendation, schema};
use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
const LOG_ENV: &str = "ADVISOR_LOG";

fn main() -> ExitCode {
    let args = match AdviseArgs::try_parse() {
        Ok(args) => args,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => return report_error(&anyhow::Error::new(AdvisorError::from(err))),
    };
    init_tracing(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report_error(&err),
    }
}

fn run(args: &AdviseArgs) -> Result<()> {
    let observation = args.observation()?;
    let rules = rules::load_rules(args.rules.as_deref()).context("load rules")?;
    let recommendation = advise(&rules, observation, schema::now_timestamp())?;

    if args.json {
        let json = serde_json::to_string_pretty(&recommendation)
            .context("serialize recommendation")?;
        println!("{json}");
    } else {
        print!("{}", report::render_summary(&recommendation));
    }

    if args.no_save {
        tracing::info!("--no-save given; outputs not written");
        return Ok(());
    }

    let saved = save_recommendation(&args.out_dir, &recommendation).context("save outputs")?;
    if !args.json {
        let cwd = std::env::current_dir().ok();
        println!();
        println!(
            "Saved: {}",
            display_path(&saved.report_path, cwd.as_deref())
        );
        println!(
            "History: {} ({} records)",
            display_path(&saved.history_path, cwd.as_deref()),
            saved.history_len
        );
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn report_error(err: &anyhow::Error) -> ExitCode {
    eprintln!("error: {err:#}");
    let code = err
        .downcast_ref::<AdvisorError>()
        .map(AdvisorError::exit_code)
        .unwrap_or(1);
    ExitCode::from(code)
}
