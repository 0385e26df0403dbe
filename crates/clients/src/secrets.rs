//! Secret resolvers.
//!
//! A secret is a JSON object whose values are strings, e.g.
//! `{"app_id": "...", "app_key": "...", "messaging_api_key": "..."}`.
//! Bundles are fetched fresh on every call and never cached.

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::debug;

use smsprobe_core::config::SecretsConfig;
use smsprobe_core::error::{ProbeError, SecretError};
use smsprobe_core::pipeline::SecretResolver;
use smsprobe_core::types::CredentialBundle;

/// Reads the secret JSON from an environment variable.
#[derive(Debug, Clone)]
pub struct EnvSecretResolver {
    var: String,
}

impl EnvSecretResolver {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl SecretResolver for EnvSecretResolver {
    async fn resolve(&self) -> Result<CredentialBundle, ProbeError> {
        let raw = std::env::var(&self.var).map_err(|e| {
            SecretError::Unavailable(format!("environment variable {}: {e}", self.var))
        })?;
        let bundle = parse_secret_json(&raw)?;
        debug!(source = "env", secrets = bundle.len(), "credential bundle resolved");
        Ok(bundle)
    }
}

/// Reads the secret JSON from a file.
#[derive(Debug, Clone)]
pub struct FileSecretResolver {
    path: PathBuf,
}

impl FileSecretResolver {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SecretResolver for FileSecretResolver {
    async fn resolve(&self) -> Result<CredentialBundle, ProbeError> {
        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            SecretError::Unavailable(format!("{}: {e}", self.path.display()))
        })?;
        let bundle = parse_secret_json(&raw)?;
        debug!(source = "file", secrets = bundle.len(), "credential bundle resolved");
        Ok(bundle)
    }
}

/// Resolver chosen at runtime from `[secrets] source`.
#[derive(Debug, Clone)]
pub enum SecretSource {
    Env(EnvSecretResolver),
    File(FileSecretResolver),
}

impl SecretSource {
    pub fn from_config(config: &SecretsConfig) -> Result<Self, SecretError> {
        match config.source.as_str() {
            "env" => Ok(Self::Env(EnvSecretResolver::new(&config.env_var))),
            "file" => Ok(Self::File(FileSecretResolver::new(&config.path))),
            other => Err(SecretError::Unavailable(format!(
                "unknown secret source '{other}'"
            ))),
        }
    }
}

impl SecretResolver for SecretSource {
    async fn resolve(&self) -> Result<CredentialBundle, ProbeError> {
        match self {
            Self::Env(r) => r.resolve().await,
            Self::File(r) => r.resolve().await,
        }
    }
}

/// Parses a JSON object of string values into a bundle.
pub fn parse_secret_json(raw: &str) -> Result<CredentialBundle, SecretError> {
    let map: HashMap<String, String> =
        serde_json::from_str(raw).map_err(|e| SecretError::Malformed(e.to_string()))?;
    Ok(CredentialBundle::new(map))
}
