mod cli;
mod effects;
mod render;
mod session;
mod settings;

use std::io;
use std::path::Path;
use std::process::ExitCode;

use analyzer_core::AppState;
use analyzer_engine::EngineHandle;
use analyzer_logging::{analyzer_error, analyzer_info, LevelFilter, LogDestination};
use anyhow::{Context, Result};
use clap::Parser;

use cli::{Cli, Command};
use effects::EffectRunner;
use session::Session;
use settings::AppSettings;

const LOG_FILE: &str = "./analyzer.log";

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            analyzer_error!("{:#}", err);
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cli: &Cli) {
    let destination = if cli.log_file {
        LogDestination::Both
    } else {
        LogDestination::Terminal
    };
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    analyzer_logging::initialize(destination, level, Path::new(LOG_FILE));
}

fn run(cli: Cli) -> Result<bool> {
    let settings = AppSettings::load(cli.config.as_deref())?.with_overrides(&cli);
    let config = settings.engine_config()?;
    analyzer_info!(
        "Using service {} (output dir {:?})",
        config.service.base_url,
        config.output_dir
    );

    let engine = EngineHandle::new(config).context("failed to start analysis engine")?;
    let state = AppState::new().with_user_name(settings.user_name);
    let mut session = Session::new(state, EffectRunner::new(engine), io::stdout());

    let outcome = match &cli.command {
        Command::Analyze(args) => session.analyze(args),
        Command::Session => session.interactive(io::stdin().lock()),
    };
    session.finish();
    outcome
}
