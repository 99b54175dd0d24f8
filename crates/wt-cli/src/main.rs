mod cli;
mod error;
mod logger;
mod outcome;
mod signals;

#[cfg(test)]
mod tests;

use crate::cli::Cli;
use crate::outcome::RunOutcome;

use std::process::ExitCode;

use clap::Parser;
use log::{error, info, warn};
use wt_config::HarnessConfig;
use wt_harness::{
    ReadinessPolicy, Report, ShutdownOutcome, build_catalogue, check_preconditions, run_session,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match HarnessConfig::load(cli.settings.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };
    cli.apply_overrides(&mut config);

    if let Err(e) = config.validate() {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    if let Err(e) = logger::initialize(
        config.logging.level,
        config.logging.file.clone(),
        config.logging.colored,
    ) {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    info!("webserv-tester v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    if let Err(e) = check_preconditions(&config.target) {
        error!("{e}");
        error!("{}", e.recovery_hint());
        return RunOutcome::PreconditionFailed.into();
    }

    let interrupt = match signals::interrupt_listener() {
        Ok(interrupt) => interrupt,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let categories = build_catalogue(&config, &cli.categories);
    let run = match run_session(&config, &categories, interrupt).await {
        Ok(run) => run,
        Err(e) => {
            error!("Server startup failed: {e}");
            error!("{}", e.recovery_hint());
            error!("No checks were run");
            return RunOutcome::StartupFailed.into();
        }
    };

    if run.shutdown == ShutdownOutcome::Forced {
        warn!("Server process group was force-killed");
    }

    let report = Report::new(&run.session, ReadinessPolicy::from_config(&config.report));
    if cli.json {
        match report.to_json() {
            Ok(json) => println!("{json}"),
            Err(e) => {
                error!("Failed to serialize report: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("{report}");
    }

    if run.session.is_interrupted() {
        warn!("Session interrupted; the report covers only completed checks");
        RunOutcome::Interrupted.into()
    } else {
        RunOutcome::Completed.into()
    }
}
