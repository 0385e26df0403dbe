//! `smsprobe config` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use smsprobe_core::config::ProbeConfig;

use crate::cli::{ConfigAction, ConfigArgs};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

const SECTIONS: &str = "general, secrets, provider, messaging, provisioning, store, report";

/// Execute the `config` command.
///
/// `config_path` is `None` when running on defaults plus environment overrides.
pub async fn execute(
    args: ConfigArgs,
    config_path: Option<&Path>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match args.action {
        ConfigAction::Validate => execute_validate(config_path, writer).await,
        ConfigAction::Show { section } => execute_show(config_path, section, writer).await,
    }
}

/// Loads the effective configuration.
pub async fn load(config_path: Option<&Path>) -> Result<ProbeConfig, CliError> {
    let config = match config_path {
        Some(path) => ProbeConfig::load(path).await?,
        None => ProbeConfig::from_env()?,
    };
    Ok(config)
}

fn source_label(config_path: Option<&Path>) -> String {
    config_path
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(defaults + environment)".to_owned())
}

async fn execute_validate(
    config_path: Option<&Path>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    info!(source = %source_label(config_path), "validating configuration");

    let result = load(config_path).await;
    let report = ConfigValidationReport {
        source: source_label(config_path),
        valid: result.is_ok(),
        errors: result.as_ref().err().map(ToString::to_string).into_iter().collect(),
    };

    writer.render(&report)?;
    result.map(|_| ())
}

async fn execute_show(
    config_path: Option<&Path>,
    section: Option<String>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let config = load(config_path).await?;

    let config_toml = match section.as_deref() {
        None => toml::to_string_pretty(&config),
        Some("general") => toml::to_string_pretty(&config.general),
        Some("secrets") => toml::to_string_pretty(&config.secrets),
        Some("provider") => toml::to_string_pretty(&config.provider),
        Some("messaging") => toml::to_string_pretty(&config.messaging),
        Some("provisioning") => toml::to_string_pretty(&config.provisioning),
        Some("store") => toml::to_string_pretty(&config.store),
        Some("report") => toml::to_string_pretty(&config.report),
        Some(other) => {
            return Err(CliError::Command(format!(
                "unknown section: {other} (expected: {SECTIONS})"
            )));
        }
    }
    .unwrap_or_else(|e| format!("(serialization error: {e})"));

    writer.render(&ConfigReport {
        source: source_label(config_path),
        section,
        config_toml,
    })
}

/// Effective configuration display.
#[derive(Serialize)]
pub struct ConfigReport {
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    pub config_toml: String,
}

impl Render for ConfigReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        match &self.section {
            Some(section) => writeln!(
                w,
                "Configuration {} (source: {})",
                format!("[{section}]").bold(),
                self.source
            )?,
            None => writeln!(w, "Configuration (source: {})", self.source.bold())?,
        }
        writeln!(w)?;
        write!(w, "{}", self.config_toml)
    }
}

/// Configuration validation result.
#[derive(Serialize)]
pub struct ConfigValidationReport {
    pub source: String,
    pub valid: bool,
    /// Empty when valid
    pub errors: Vec<String>,
}

impl Render for ConfigValidationReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Config Validation: {}", self.source.bold())?;
        if self.valid {
            writeln!(w, "  Result: {}", "VALID".green().bold())?;
        } else {
            writeln!(w, "  Result: {}", "INVALID".red().bold())?;
            for err in &self.errors {
                writeln!(w, "  Error: {}", err.red())?;
            }
        }
        Ok(())
    }
}
