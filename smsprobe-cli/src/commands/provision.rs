//! `smsprobe provision` command handler

use std::io::Write;

use serde::Serialize;

use smsprobe_clients::{HttpMessagingPlatform, HttpTestProvider, SecretSource};
use smsprobe_core::config::ProbeConfig;
use smsprobe_core::error::ProbeError;
use smsprobe_provisioner::{FixedDelayPacer, run_provisioning};

use crate::cli::RunArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

use super::{open_store, parse_event};

/// Execute the `provision` command.
pub async fn execute(
    args: RunArgs,
    config: &ProbeConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let event = parse_event(&args.event)?;

    let secrets = SecretSource::from_config(&config.secrets).map_err(ProbeError::from)?;
    let provider = HttpTestProvider::new(&config.provider)?;
    let store = open_store(&config.store)?;
    let pacer = FixedDelayPacer::new(config.provisioning.pacing_delay());

    let summary = run_provisioning(
        &event,
        config,
        &secrets,
        provider,
        |api_key: &str| HttpMessagingPlatform::new(&config.messaging, api_key),
        &store,
        pacer,
    )
    .await?;

    writer.render(&ProvisionReport {
        run_id: summary.run_id,
        test_count: summary.test_ids.len(),
        test_ids: summary.test_ids,
    })
}

/// Provisioning run summary.
#[derive(Serialize)]
pub struct ProvisionReport {
    pub run_id: String,
    pub test_count: usize,
    pub test_ids: Vec<String>,
}

impl Render for ProvisionReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Provisioning run {}", self.run_id.bold())?;
        writeln!(
            w,
            "  Tests created: {}",
            self.test_count.to_string().green().bold()
        )?;
        for id in &self.test_ids {
            writeln!(w, "    {id}")?;
        }
        Ok(())
    }
}
