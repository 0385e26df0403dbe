//! CLI argument parsing using clap derive API
//!
//! Purely declarative: no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// smsprobe -- SMS deliverability test provisioning and reporting.
///
/// Use `smsprobe <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "smsprobe", version, about, long_about = None)]
pub struct Cli {
    /// Path to the smsprobe.toml configuration file.
    ///
    /// Without it, built-in defaults plus `SMSPROBE_*` environment overrides are used.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Override log format (json, pretty).
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Output format for command summaries.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create provider tests, send notifications and persist the test ids.
    Provision(RunArgs),

    /// Collect results for the persisted test ids and email the report.
    Report(RunArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

/// Arguments shared by the workflow commands.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Trigger event as a JSON document. Logged, otherwise unused.
    #[arg(long, default_value = "{}")]
    pub event: String,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only one section (general, secrets, provider, messaging,
        /// provisioning, store, report).
        #[arg(long)]
        section: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn provision_defaults_to_empty_event() {
        let cli = Cli::try_parse_from(["smsprobe", "provision"]).expect("parse succeeded");
        match cli.command {
            Commands::Provision(args) => assert_eq!(args.event, "{}"),
            _ => panic!("expected Provision command"),
        }
        assert!(cli.config.is_none());
    }

    #[test]
    fn report_accepts_event_and_global_flags() {
        let cli = Cli::try_parse_from([
            "smsprobe",
            "report",
            "--event",
            r#"{"source":"cron"}"#,
            "--config",
            "/etc/smsprobe.toml",
            "--log-format",
            "pretty",
        ])
        .expect("parse succeeded");
        assert_eq!(cli.config, Some(PathBuf::from("/etc/smsprobe.toml")));
        assert_eq!(cli.log_format.as_deref(), Some("pretty"));
        match cli.command {
            Commands::Report(args) => assert_eq!(args.event, r#"{"source":"cron"}"#),
            _ => panic!("expected Report command"),
        }
    }

    #[test]
    fn config_show_with_section() {
        let cli = Cli::try_parse_from(["smsprobe", "config", "show", "--section", "report"])
            .expect("parse succeeded");
        match cli.command {
            Commands::Config(ConfigArgs {
                action: ConfigAction::Show { section },
            }) => assert_eq!(section.as_deref(), Some("report")),
            _ => panic!("expected config show"),
        }
    }

    #[test]
    fn output_json_flag() {
        let cli = Cli::try_parse_from(["smsprobe", "--output", "json", "config", "validate"])
            .expect("parse succeeded");
        assert!(matches!(cli.output, OutputFormat::Json));
    }

    #[test]
    fn missing_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["smsprobe"]).is_err());
    }

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
