//! Key-value backend abstraction for the identifier store.
//!
//! The [`KvBackend`] trait is the only thing [`IdentifierStore`](crate::IdentifierStore)
//! knows about persistence. Records are small attribute maps keyed by an
//! integer index, mirroring a hash-keyed document table.
//!
//! # Implementations
//!
//! - [`MemoryBackend`]: process-local map, used by tests and dry runs
//! - [`JsonFileBackend`]: a single JSON document on disk
//! - [`StoreBackend`]: runtime selection between the two from configuration

use std::collections::BTreeMap;
use std::future::Future;
use std::path::{Path, PathBuf};

use tokio::sync::Mutex;
use tracing::debug;

use smsprobe_core::config::StoreConfig;
use smsprobe_core::error::StoreError;

/// One stored record: attribute name -> string value.
pub type Item = BTreeMap<String, String>;

/// Integer-keyed get/put storage.
///
/// No cross-key transactions are offered. A reader running concurrently with a
/// writer may observe any interleaving of individual puts.
pub trait KvBackend: Send + Sync {
    /// Returns the record at `key`, or `None` if absent.
    fn get(&self, key: u64) -> impl Future<Output = Result<Option<Item>, StoreError>> + Send;

    /// Stores `item` at `key`, replacing any previous record.
    fn put(&self, key: u64, item: Item) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// In-memory backend. Contents live as long as the value.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    items: Mutex<BTreeMap<u64, Item>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records (count record included).
    pub async fn len(&self) -> usize {
        self.items.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.lock().await.is_empty()
    }
}

impl KvBackend for MemoryBackend {
    async fn get(&self, key: u64) -> Result<Option<Item>, StoreError> {
        Ok(self.items.lock().await.get(&key).cloned())
    }

    async fn put(&self, key: u64, item: Item) -> Result<(), StoreError> {
        self.items.lock().await.insert(key, item);
        Ok(())
    }
}

/// File-backed backend.
///
/// The whole table is one JSON object (`{"0": {...}, "1": {...}}`). Every put
/// is a read-modify-write of that document, written to a sibling temp file and
/// renamed into place. A missing file reads as an empty table.
#[derive(Debug)]
pub struct JsonFileBackend {
    path: PathBuf,
    // puts from the same process must not interleave their read-modify-write
    write_lock: Mutex<()>,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<BTreeMap<u64, Item>, StoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "store file not found, treating as empty");
                return Ok(BTreeMap::new());
            }
            Err(e) => {
                return Err(StoreError::Backend(format!(
                    "failed to read {}: {e}",
                    self.path.display()
                )));
            }
        };

        serde_json::from_str(&content).map_err(|e| {
            StoreError::Backend(format!("failed to parse {}: {e}", self.path.display()))
        })
    }

    async fn save(&self, table: &BTreeMap<u64, Item>) -> Result<(), StoreError> {
        let body = serde_json::to_string_pretty(table)
            .map_err(|e| StoreError::Backend(format!("failed to serialize table: {e}")))?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StoreError::Backend(format!("failed to create {}: {e}", parent.display()))
            })?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, body).await.map_err(|e| {
            StoreError::Backend(format!("failed to write {}: {e}", tmp_path.display()))
        })?;
        tokio::fs::rename(&tmp_path, &self.path).await.map_err(|e| {
            StoreError::Backend(format!("failed to replace {}: {e}", self.path.display()))
        })
    }
}

impl KvBackend for JsonFileBackend {
    async fn get(&self, key: u64) -> Result<Option<Item>, StoreError> {
        let mut table = self.load().await?;
        Ok(table.remove(&key))
    }

    async fn put(&self, key: u64, item: Item) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut table = self.load().await?;
        table.insert(key, item);
        self.save(&table).await
    }
}

/// Backend chosen at runtime from `[store] backend`.
#[derive(Debug)]
pub enum StoreBackend {
    Memory(MemoryBackend),
    File(JsonFileBackend),
}

impl StoreBackend {
    /// Builds the backend named by the configuration.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` for an unknown backend kind.
    pub fn from_config(config: &StoreConfig) -> Result<Self, StoreError> {
        match config.backend.as_str() {
            "memory" => Ok(Self::Memory(MemoryBackend::new())),
            "file" => Ok(Self::File(JsonFileBackend::new(&config.path))),
            other => Err(StoreError::Backend(format!(
                "unknown store backend '{other}'"
            ))),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::File(_) => "file",
        }
    }
}

impl KvBackend for StoreBackend {
    async fn get(&self, key: u64) -> Result<Option<Item>, StoreError> {
        match self {
            Self::Memory(b) => b.get(key).await,
            Self::File(b) => b.get(key).await,
        }
    }

    async fn put(&self, key: u64, item: Item) -> Result<(), StoreError> {
        match self {
            Self::Memory(b) => b.put(key, item).await,
            Self::File(b) => b.put(key, item).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(attr: &str, value: &str) -> Item {
        BTreeMap::from([(attr.to_owned(), value.to_owned())])
    }

    #[tokio::test]
    async fn memory_backend_put_then_get() {
        let backend = MemoryBackend::new();
        assert!(backend.get(1).await.unwrap().is_none());

        backend.put(1, item("test_id", "abc")).await.unwrap();
        assert_eq!(backend.get(1).await.unwrap(), Some(item("test_id", "abc")));
        assert_eq!(backend.len().await, 1);
    }

    #[tokio::test]
    async fn memory_backend_put_replaces() {
        let backend = MemoryBackend::new();
        backend.put(0, item("id_count", "1")).await.unwrap();
        backend.put(0, item("id_count", "2")).await.unwrap();
        assert_eq!(backend.get(0).await.unwrap(), Some(item("id_count", "2")));
    }

    #[tokio::test]
    async fn file_backend_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::new(dir.path().join("ids.json"));
        assert!(backend.get(0).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn file_backend_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("ids.json");

        let backend = JsonFileBackend::new(&path);
        backend.put(0, item("id_count", "1")).await.unwrap();
        backend.put(1, item("test_id", "42")).await.unwrap();

        let reopened = JsonFileBackend::new(&path);
        assert_eq!(reopened.get(1).await.unwrap(), Some(item("test_id", "42")));
        assert_eq!(reopened.get(0).await.unwrap(), Some(item("id_count", "1")));
    }

    #[tokio::test]
    async fn file_backend_rejects_garbage_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ids.json");
        tokio::fs::write(&path, "not json").await.unwrap();

        let backend = JsonFileBackend::new(&path);
        let err = backend.get(0).await.unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
    }

    #[test]
    fn store_backend_from_config() {
        let mut config = StoreConfig::default();
        assert_eq!(StoreBackend::from_config(&config).unwrap().kind(), "file");

        config.backend = "memory".to_owned();
        assert_eq!(StoreBackend::from_config(&config).unwrap().kind(), "memory");

        config.backend = "sqlite".to_owned();
        assert!(StoreBackend::from_config(&config).is_err());
    }
}
