//! CLI error type and exit code mapping

use smsprobe_core::error::ProbeError;

/// CLI-level error.
///
/// `exit_code()` maps each failure class to a distinct process exit code so
/// schedulers can tell configuration mistakes from upstream outages.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// The `--event` argument is not valid JSON.
    #[error("invalid trigger event: {0}")]
    Event(#[source] serde_json::Error),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Logging could not be initialized.
    #[error("logging error: {0}")]
    Logging(String),

    /// Wrapped workflow error.
    #[error("{0}")]
    Core(#[from] ProbeError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                                  |
    /// |------|------------------------------------------|
    /// | 0    | Success                                  |
    /// | 1    | Any other failure                        |
    /// | 2    | Configuration error                      |
    /// | 3    | Identifier store error                   |
    /// | 4    | Malformed upstream response              |
    /// | 5    | Network failure or non-success status    |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Core(ProbeError::Config(_)) => 2,
            Self::Core(ProbeError::Store(_)) => 3,
            Self::Core(ProbeError::Upstream(_)) => 4,
            Self::Core(ProbeError::Transport(_)) => 5,
            Self::Core(_)
            | Self::Command(_)
            | Self::Event(_)
            | Self::JsonSerialize(_)
            | Self::Io(_)
            | Self::Logging(_) => 1,
        }
    }
}
