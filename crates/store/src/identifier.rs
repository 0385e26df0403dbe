//! 테스트 식별자 목록: key-value 백엔드 위의 count-prefix 순서 리스트
//!
//! # 레코드 배치
//!
//! ```text
//! key 0      {"id_count": "<n>"}
//! key 1..=n  {"test_id": "<id>"}
//! ```
//!
//! `write()`는 목록 전체를 덮어씁니다 (count 먼저, 이후 각 항목 순서대로).
//! 여러 키에 걸친 트랜잭션은 없으므로, 쓰기 도중의 `read()`는 count와 항목이
//! 맞지 않는 상태를 볼 수 있습니다. 동시 실행이 필요하면 호출자가 상호 배제를 추가해야 합니다.
//!
//! 이전 실행보다 짧은 목록을 쓰면 `n` 이후의 오래된 항목은 남아 있지만 읽지 않습니다.

use std::collections::BTreeMap;

use tracing::{debug, info};

use smsprobe_core::error::StoreError;

use crate::backend::{Item, KvBackend};

/// count 레코드가 위치하는 예약 키
pub const COUNT_KEY: u64 = 0;

/// count 레코드의 속성명
pub const COUNT_ATTR: &str = "id_count";

/// 항목 레코드의 속성명
pub const ID_ATTR: &str = "test_id";

/// 프로비저닝과 결과 수집 사이를 잇는 식별자 저장소
#[derive(Debug)]
pub struct IdentifierStore<B> {
    backend: B,
}

impl<B: KvBackend> IdentifierStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// 내부 백엔드 참조
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// 목록 전체를 기록합니다.
    ///
    /// `COUNT_KEY`에 `len(ids)`를 쓰고, 각 id를 `index + 1` 키에 씁니다.
    pub async fn write(&self, ids: &[String]) -> Result<(), StoreError> {
        self.backend
            .put(COUNT_KEY, single(COUNT_ATTR, ids.len().to_string()))
            .await?;

        for (index, id) in ids.iter().enumerate() {
            let key = u64::try_from(index + 1)
                .map_err(|_| StoreError::Backend("identifier index overflow".to_owned()))?;
            self.backend.put(key, single(ID_ATTR, id.clone())).await?;
        }

        info!(count = ids.len(), "identifier list written");
        Ok(())
    }

    /// 목록 전체를 읽습니다.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound`: 예약 키 또는 `[1, count]` 범위의 항목 키가 없음
    /// - `StoreError::Corrupt`: 속성이 없거나 count가 숫자가 아님
    pub async fn read(&self) -> Result<Vec<String>, StoreError> {
        let count_item = self
            .backend
            .get(COUNT_KEY)
            .await?
            .ok_or(StoreError::NotFound { key: COUNT_KEY })?;

        let raw_count = attr(&count_item, COUNT_KEY, COUNT_ATTR)?;
        let count: u64 = raw_count.trim().parse().map_err(|_| StoreError::Corrupt {
            key: COUNT_KEY,
            reason: format!("'{raw_count}' is not a valid count"),
        })?;
        debug!(count, "identifier count read");

        let mut ids = Vec::new();
        for key in 1..=count {
            let item = self
                .backend
                .get(key)
                .await?
                .ok_or(StoreError::NotFound { key })?;
            ids.push(attr(&item, key, ID_ATTR)?.to_owned());
        }

        Ok(ids)
    }
}

fn single(attr: &str, value: String) -> Item {
    BTreeMap::from([(attr.to_owned(), value)])
}

fn attr<'a>(item: &'a Item, key: u64, name: &str) -> Result<&'a str, StoreError> {
    item.get(name)
        .map(String::as_str)
        .ok_or_else(|| StoreError::Corrupt {
            key,
            reason: format!("missing attribute '{name}'"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| (*s).to_owned()).collect()
    }

    #[tokio::test]
    async fn write_then_read_preserves_order() {
        let store = IdentifierStore::new(MemoryBackend::new());
        let written = ids(&["9001", "9002", "9003"]);
        store.write(&written).await.unwrap();
        assert_eq!(store.read().await.unwrap(), written);
    }

    #[tokio::test]
    async fn write_lays_out_count_then_items() {
        let store = IdentifierStore::new(MemoryBackend::new());
        store.write(&ids(&["a", "b"])).await.unwrap();

        let backend = store.backend();
        assert_eq!(
            backend.get(0).await.unwrap(),
            Some(single(COUNT_ATTR, "2".to_owned()))
        );
        assert_eq!(
            backend.get(2).await.unwrap(),
            Some(single(ID_ATTR, "b".to_owned()))
        );
        assert!(backend.get(3).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn read_uninitialized_store_is_not_found() {
        let store = IdentifierStore::new(MemoryBackend::new());
        let err = store.read().await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { key: 0 }));
    }

    #[tokio::test]
    async fn read_with_missing_item_is_not_found() {
        let backend = MemoryBackend::new();
        backend
            .put(COUNT_KEY, single(COUNT_ATTR, "3".to_owned()))
            .await
            .unwrap();
        backend.put(1, single(ID_ATTR, "x".to_owned())).await.unwrap();
        backend.put(3, single(ID_ATTR, "z".to_owned())).await.unwrap();

        let store = IdentifierStore::new(backend);
        let err = store.read().await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { key: 2 }));
    }

    #[tokio::test]
    async fn read_with_non_numeric_count_is_corrupt() {
        let backend = MemoryBackend::new();
        backend
            .put(COUNT_KEY, single(COUNT_ATTR, "many".to_owned()))
            .await
            .unwrap();

        let store = IdentifierStore::new(backend);
        let err = store.read().await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { key: 0, .. }));
    }

    #[tokio::test]
    async fn shorter_rewrite_ignores_stale_items() {
        let store = IdentifierStore::new(MemoryBackend::new());
        store.write(&ids(&["1", "2", "3"])).await.unwrap();
        store.write(&ids(&["7"])).await.unwrap();

        assert_eq!(store.read().await.unwrap(), ids(&["7"]));
        // 이전 실행의 항목은 그대로 남음
        assert!(store.backend().get(3).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn empty_write_reads_back_empty() {
        let store = IdentifierStore::new(MemoryBackend::new());
        store.write(&[]).await.unwrap();
        assert!(store.read().await.unwrap().is_empty());
    }
}
