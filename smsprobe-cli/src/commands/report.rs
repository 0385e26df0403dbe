//! `smsprobe report` command handler

use std::io::Write;

use serde::Serialize;

use smsprobe_clients::{HttpTestProvider, SecretSource};
use smsprobe_core::config::ProbeConfig;
use smsprobe_core::error::ProbeError;
use smsprobe_reporter::{Mailer, run_report};

use crate::cli::RunArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

use super::{open_store, parse_event};

/// Execute the `report` command.
pub async fn execute(
    args: RunArgs,
    config: &ProbeConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let event = parse_event(&args.event)?;

    let secrets = SecretSource::from_config(&config.secrets).map_err(ProbeError::from)?;
    let provider = HttpTestProvider::new(&config.provider)?;
    let store = open_store(&config.store)?;
    let mailer = Mailer::from_config(&config.report);

    let summary = run_report(&event, config, &secrets, &provider, &store, &mailer).await?;

    writer.render(&ReportRunReport {
        run_id: summary.run_id,
        results: summary.results,
        delivered: summary.delivered,
        csv_attached: summary.csv_attached,
        testing_mode: config.report.testing_mode,
    })
}

/// Report run summary.
#[derive(Serialize)]
pub struct ReportRunReport {
    pub run_id: String,
    pub results: usize,
    pub delivered: usize,
    pub csv_attached: bool,
    pub testing_mode: bool,
}

impl Render for ReportRunReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Report run {}", self.run_id.bold())?;
        writeln!(
            w,
            "  Results: {} ({} delivered)",
            self.results,
            self.delivered.to_string().green()
        )?;
        writeln!(
            w,
            "  CSV attached: {}",
            if self.csv_attached { "yes" } else { "no" }
        )?;
        if self.testing_mode {
            writeln!(w, "  {}", "Testing mode: email logged, not sent".yellow())?;
        }
        Ok(())
    }
}
