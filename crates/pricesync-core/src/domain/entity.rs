//! 추적 대상 종목과 시세.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::normalize_ticker;

/// 저장소에서 읽어 온 추적 대상 종목.
///
/// 한 번의 실행 동안 변하지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedEntity {
    /// 저장소 행 ID (불투명 문자열)
    pub row_id: String,
    /// 저장소에 기록된 티커 원문 (비어 있을 수 있음)
    pub ticker: String,
}

impl TrackedEntity {
    pub fn new(row_id: impl Into<String>, ticker: impl Into<String>) -> Self {
        Self {
            row_id: row_id.into(),
            ticker: ticker.into(),
        }
    }

    /// 조회 키로 사용할 정규화된 티커. 비어 있으면 `None`.
    pub fn normalized_ticker(&self) -> Option<String> {
        normalize_ticker(&self.ticker)
    }
}

/// 한 시점의 시세.
///
/// 소스 응답에서 숫자로 파싱된 값으로만 생성되며, 저장소 업데이트 직후 버려집니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    /// 티커
    pub ticker: String,
    /// 가격
    pub value: Decimal,
    /// 조회 시각
    pub as_of: DateTime<Utc>,
}

impl PriceQuote {
    /// 현재 시각으로 시세를 생성합니다.
    pub fn new(ticker: impl Into<String>, value: Decimal) -> Self {
        Self {
            ticker: ticker.into(),
            value,
            as_of: Utc::now(),
        }
    }

    /// 저장소에 쓸 수 있는 가격인지 (0보다 커야 함).
    pub fn is_valid(&self) -> bool {
        self.value > Decimal::ZERO
    }
}
