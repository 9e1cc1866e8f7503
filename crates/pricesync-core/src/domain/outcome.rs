//! 종목별 처리 결과.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::TrackedEntity;

/// 종목 처리 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// 가격과 시각이 저장소에 기록됨
    Updated,
    /// 시세는 받았으나 유효한 가격이 아님 (0 이하)
    SkippedNoPrice,
    /// 티커가 비어 있어 조회하지 않음
    SkippedNoTicker,
    /// 시세 조회 실패
    FetchError,
    /// 저장소 업데이트 실패
    UpdateError,
}

impl OutcomeStatus {
    /// 보고서 출력 순서
    pub const ALL: [OutcomeStatus; 5] = [
        Self::Updated,
        Self::SkippedNoPrice,
        Self::SkippedNoTicker,
        Self::FetchError,
        Self::UpdateError,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Updated => "updated",
            Self::SkippedNoPrice => "skipped_no_price",
            Self::SkippedNoTicker => "skipped_no_ticker",
            Self::FetchError => "fetch_error",
            Self::UpdateError => "update_error",
        }
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, Self::SkippedNoPrice | Self::SkippedNoTicker)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::FetchError | Self::UpdateError)
    }
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 한 종목의 처리 결과.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOutcome {
    /// 티커 (정규화 전 원문일 수 있음)
    pub ticker: String,
    /// 저장소 행 ID
    pub row_id: String,
    /// 처리 상태
    pub status: OutcomeStatus,
    /// 기록했거나 거부된 가격
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    /// 실패/건너뜀 사유
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl UpdateOutcome {
    fn new(entity: &TrackedEntity, ticker: &str, status: OutcomeStatus) -> Self {
        Self {
            ticker: ticker.to_string(),
            row_id: entity.row_id.clone(),
            status,
            price: None,
            detail: None,
        }
    }

    pub fn updated(entity: &TrackedEntity, ticker: &str, price: Decimal) -> Self {
        Self {
            price: Some(price),
            ..Self::new(entity, ticker, OutcomeStatus::Updated)
        }
    }

    pub fn skipped_no_ticker(entity: &TrackedEntity) -> Self {
        Self {
            detail: Some("empty ticker".to_string()),
            ..Self::new(entity, &entity.ticker, OutcomeStatus::SkippedNoTicker)
        }
    }

    pub fn skipped_no_price(entity: &TrackedEntity, ticker: &str, price: Decimal) -> Self {
        Self {
            price: Some(price),
            detail: Some(format!("non-positive price {}", price)),
            ..Self::new(entity, ticker, OutcomeStatus::SkippedNoPrice)
        }
    }

    pub fn fetch_error(entity: &TrackedEntity, ticker: &str, detail: impl Into<String>) -> Self {
        Self {
            detail: Some(detail.into()),
            ..Self::new(entity, ticker, OutcomeStatus::FetchError)
        }
    }

    pub fn update_error(
        entity: &TrackedEntity,
        ticker: &str,
        price: Decimal,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            price: Some(price),
            detail: Some(detail.into()),
            ..Self::new(entity, ticker, OutcomeStatus::UpdateError)
        }
    }
}
