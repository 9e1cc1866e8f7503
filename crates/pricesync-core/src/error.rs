//! 시세 조회 및 저장소 에러 타입.
//!
//! 두 에러 모두 종목 단위에서 처리되며, 목록 조회 실패(`RegistryError::QueryFailed`)만
//! 실행 전체를 중단시킵니다.

use thiserror::Error;

/// 시세 조회 에러.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// 성공이 아닌 HTTP 상태 코드
    #[error("bad_status: HTTP {code}")]
    BadStatus {
        /// 응답 상태 코드
        code: u16,
    },

    /// 가격 필드가 없거나, null 이거나, 숫자로 변환할 수 없음
    #[error("missing_or_unparseable: {ticker}")]
    MissingOrUnparseable {
        /// 조회한 티커
        ticker: String,
    },

    /// 전송 또는 응답 처리 중 예외
    #[error("exception: {detail}")]
    Exception {
        /// 원인 메시지
        detail: String,
    },
}

impl FetchError {
    /// 에러 분류 이름.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::BadStatus { .. } => "bad_status",
            Self::MissingOrUnparseable { .. } => "missing_or_unparseable",
            Self::Exception { .. } => "exception",
        }
    }
}

/// 저장소(레지스트리) 에러.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// 목록 조회 실패 (실행 중단)
    #[error("query_failed: {detail}")]
    QueryFailed {
        /// 원인 메시지
        detail: String,
    },

    /// 행 업데이트 실패 (해당 행만 실패 처리)
    #[error("update_failed ({}): {detail}", .code.map_or_else(|| "no status".to_string(), |c| format!("HTTP {c}")))]
    UpdateFailed {
        /// 응답 상태 코드 (전송 실패 시 None)
        code: Option<u16>,
        /// 원인 메시지
        detail: String,
    },
}

impl RegistryError {
    /// 에러 분류 이름.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::QueryFailed { .. } => "query_failed",
            Self::UpdateFailed { .. } => "update_failed",
        }
    }
}
