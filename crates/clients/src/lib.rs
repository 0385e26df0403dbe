//! smsprobe adapters for external collaborators.
//!
//! # Module Structure
//!
//! - [`provider`]: `HttpTestProvider` (token exchange, test creation, result lookup)
//! - [`messaging`]: `HttpMessagingPlatform` (contacts, notifications)
//! - [`secrets`]: `EnvSecretResolver`, `FileSecretResolver`, `SecretSource`
//!
//! Response decoding never panics on unexpected shapes: a missing field is an
//! `UpstreamError::MalformedResponse` carrying the raw body, logged when created.

mod http;
pub mod messaging;
pub mod provider;
pub mod secrets;

pub use messaging::HttpMessagingPlatform;
pub use provider::HttpTestProvider;
pub use secrets::{EnvSecretResolver, FileSecretResolver, SecretSource, parse_secret_json};
