//! smsprobe command-line entry point.
//!
//! Loads configuration, applies CLI overrides, initializes logging and
//! dispatches to a command handler. Errors are printed to stderr and mapped to
//! exit codes by [`CliError::exit_code`].

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use std::path::Path;

use clap::Parser;

use smsprobe_core::config::ProbeConfig;

use cli::{Cli, Commands};
use error::CliError;
use output::OutputWriter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let Cli {
        config: config_path,
        log_level,
        log_format,
        output,
        command,
    } = cli;
    let writer = OutputWriter::new(output);
    let config_path = config_path.as_deref();

    match command {
        // 잘못된 설정도 보고해야 하므로 로깅 초기화 없이 처리합니다.
        Commands::Config(args) => commands::config::execute(args, config_path, &writer).await,
        Commands::Provision(args) => {
            let config = prepare(config_path, log_level, log_format, "provision").await?;
            commands::provision::execute(args, &config, &writer).await
        }
        Commands::Report(args) => {
            let config = prepare(config_path, log_level, log_format, "report").await?;
            commands::report::execute(args, &config, &writer).await
        }
    }
}

/// Loads configuration, applies CLI log overrides and initializes logging.
async fn prepare(
    config_path: Option<&Path>,
    log_level: Option<String>,
    log_format: Option<String>,
    command: &str,
) -> Result<ProbeConfig, CliError> {
    let mut config = commands::config::load(config_path).await?;
    if let Some(level) = log_level {
        config.general.log_level = level;
    }
    if let Some(format) = log_format {
        config.general.log_format = format;
    }

    logging::init_tracing(&config.general).map_err(|e| CliError::Logging(e.to_string()))?;
    tracing::info!(
        command,
        config = %config_path.map_or_else(|| "(defaults)".to_owned(), |p| p.display().to_string()),
        "smsprobe starting"
    );
    Ok(config)
}
