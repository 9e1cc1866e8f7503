//! 추적 종목 저장소 모듈.
//!
//! 가격을 기록할 종목 목록을 제공하고, 행 하나의 가격/갱신 시각을 덮어씁니다.
//!
//! - `NotionRegistry`: Notion 데이터베이스 (Query / Update Page API)
//! - `MemoryRegistry`: 프로세스 내 저장소 (테스트, dry run)

pub mod memory;
pub mod notion;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pricesync_core::{RegistryError, TrackedEntity};
use rust_decimal::Decimal;

pub use memory::{MemoryRegistry, MemoryRow};
pub use notion::{NotionRegistry, NotionSettings};

/// 추적 종목 저장소 trait.
#[async_trait]
pub trait Registry: Send + Sync {
    /// 저장소 이름 (로그용).
    fn name(&self) -> &str;

    /// 전체 추적 종목 조회.
    ///
    /// 티커가 비어 있는 행도 빈 티커로 포함합니다 (걸러내지 않음).
    /// 실패하면 부분 목록 없이 `RegistryError::QueryFailed`를 반환합니다.
    async fn list(&self) -> Result<Vec<TrackedEntity>, RegistryError>;

    /// 행 하나의 가격과 갱신 시각을 덮어씁니다.
    async fn update(
        &self,
        row_id: &str,
        price: Decimal,
        as_of: DateTime<Utc>,
    ) -> Result<(), RegistryError>;
}
