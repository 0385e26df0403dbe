//! Command handlers -- one module per subcommand

pub mod config;
pub mod provision;
pub mod report;

use smsprobe_core::error::ProbeError;
use smsprobe_store::{IdentifierStore, StoreBackend};

use crate::error::CliError;

/// Parses the `--event` argument.
pub(crate) fn parse_event(raw: &str) -> Result<serde_json::Value, CliError> {
    serde_json::from_str(raw).map_err(CliError::Event)
}

/// Opens the identifier store named by `[store]`.
pub(crate) fn open_store(
    config: &smsprobe_core::config::StoreConfig,
) -> Result<IdentifierStore<StoreBackend>, CliError> {
    let backend = StoreBackend::from_config(config).map_err(ProbeError::from)?;
    match &backend {
        StoreBackend::File(file) => tracing::debug!(
            backend = backend.kind(),
            path = %file.path().display(),
            "identifier store opened"
        ),
        StoreBackend::Memory(_) => {
            tracing::debug!(backend = backend.kind(), "identifier store opened");
        }
    }
    Ok(IdentifierStore::new(backend))
}
