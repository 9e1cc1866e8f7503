//! 프로세스 내 저장소.
//!
//! 네트워크 없이 동기화 흐름을 검증할 때 사용합니다.
//! 목록/갱신 호출 횟수를 기록하고, 목록 조회나 특정 행 갱신을 실패시키도록 설정할 수 있습니다.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pricesync_core::{RegistryError, TrackedEntity};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use super::Registry;

/// 저장된 행.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryRow {
    pub entity: TrackedEntity,
    pub price: Option<Decimal>,
    pub last_updated: Option<DateTime<Utc>>,
}

/// 메모리 저장소.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    rows: Mutex<Vec<MemoryRow>>,
    listing_failure: Option<String>,
    failing_rows: HashSet<String>,
    list_calls: AtomicUsize,
    update_calls: Mutex<Vec<String>>,
}

impl MemoryRegistry {
    pub fn new(entities: impl IntoIterator<Item = TrackedEntity>) -> Self {
        let rows = entities
            .into_iter()
            .map(|entity| MemoryRow {
                entity,
                price: None,
                last_updated: None,
            })
            .collect();

        Self {
            rows: Mutex::new(rows),
            ..Default::default()
        }
    }

    /// `(row_id, ticker)` 쌍으로 생성
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self::new(
            pairs
                .into_iter()
                .map(|(row_id, ticker)| TrackedEntity::new(row_id, ticker)),
        )
    }

    /// 목록 조회가 항상 실패하도록 설정
    pub fn with_listing_failure(mut self, detail: impl Into<String>) -> Self {
        self.listing_failure = Some(detail.into());
        self
    }

    /// 특정 행 갱신이 실패하도록 설정
    pub fn with_failing_update(mut self, row_id: impl Into<String>) -> Self {
        self.failing_rows.insert(row_id.into());
        self
    }

    /// 행 조회
    pub fn row(&self, row_id: &str) -> Option<MemoryRow> {
        self.lock_rows()
            .iter()
            .find(|row| row.entity.row_id == row_id)
            .cloned()
    }

    /// `list()` 호출 횟수
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// `update()`가 호출된 행 ID (호출 순서)
    pub fn update_calls(&self) -> Vec<String> {
        self.update_calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn lock_rows(&self) -> MutexGuard<'_, Vec<MemoryRow>> {
        self.rows.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Registry for MemoryRegistry {
    fn name(&self) -> &str {
        "memory"
    }

    async fn list(&self) -> Result<Vec<TrackedEntity>, RegistryError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(detail) = &self.listing_failure {
            return Err(RegistryError::QueryFailed {
                detail: detail.clone(),
            });
        }

        Ok(self
            .lock_rows()
            .iter()
            .map(|row| row.entity.clone())
            .collect())
    }

    async fn update(
        &self,
        row_id: &str,
        price: Decimal,
        as_of: DateTime<Utc>,
    ) -> Result<(), RegistryError> {
        self.update_calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(row_id.to_string());

        if self.failing_rows.contains(row_id) {
            return Err(RegistryError::UpdateFailed {
                code: Some(500),
                detail: "simulated failure".to_string(),
            });
        }

        let mut rows = self.lock_rows();
        let row = rows
            .iter_mut()
            .find(|row| row.entity.row_id == row_id)
            .ok_or_else(|| RegistryError::UpdateFailed {
                code: Some(404),
                detail: format!("row not found: {}", row_id),
            })?;

        row.price = Some(price);
        row.last_updated = Some(as_of);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_list_keeps_empty_tickers() {
        let registry = MemoryRegistry::from_pairs([("row-1", "ENGRO"), ("row-2", "")]);

        let entities = registry.list().await.unwrap();
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[1].ticker, "");
        assert_eq!(registry.list_calls(), 1);
    }

    #[tokio::test]
    async fn test_update_overwrites() {
        let registry = MemoryRegistry::from_pairs([("row-1", "ENGRO")]);
        let t1 = Utc::now();
        let t2 = t1 + Duration::minutes(5);

        registry.update("row-1", dec!(150.25), t1).await.unwrap();
        registry.update("row-1", dec!(150.25), t2).await.unwrap();

        let row = registry.row("row-1").unwrap();
        assert_eq!(row.price, Some(dec!(150.25)));
        assert_eq!(row.last_updated, Some(t2));
        assert_eq!(registry.update_calls(), vec!["row-1", "row-1"]);
    }

    #[tokio::test]
    async fn test_unknown_row() {
        let registry = MemoryRegistry::from_pairs([("row-1", "ENGRO")]);
        let err = registry
            .update("row-9", dec!(1), Utc::now())
            .await
            .unwrap_err();
        assert_eq!(err.reason(), "update_failed");
    }

    #[tokio::test]
    async fn test_configured_failures() {
        let registry = MemoryRegistry::from_pairs([("row-1", "ENGRO")])
            .with_listing_failure("HTTP 401")
            .with_failing_update("row-1");

        assert!(matches!(
            registry.list().await,
            Err(RegistryError::QueryFailed { .. })
        ));
        assert!(matches!(
            registry.update("row-1", dec!(1), Utc::now()).await,
            Err(RegistryError::UpdateFailed { code: Some(500), .. })
        ));
        assert!(registry.row("row-1").unwrap().price.is_none());
    }
}
