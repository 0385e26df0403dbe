//! smsprobe identifier store.
//!
//! Formalizes the count-prefixed list that bridges the provisioning workflow
//! and the results workflow on top of any integer-keyed key-value backend.
//!
//! # Module Structure
//!
//! - [`backend`]: `KvBackend` trait, `MemoryBackend`, `JsonFileBackend`, `StoreBackend`
//! - [`identifier`]: `IdentifierStore` read/write contract

pub mod backend;
pub mod identifier;

pub use backend::{Item, JsonFileBackend, KvBackend, MemoryBackend, StoreBackend};
pub use identifier::{COUNT_ATTR, COUNT_KEY, ID_ATTR, IdentifierStore};
