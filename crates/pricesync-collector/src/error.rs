//! 에러 타입 정의.

use pricesync_core::RegistryError;
use thiserror::Error;

/// Collector 에러 타입
///
/// 실행 전체를 중단시키는 에러만 표현합니다.
/// 종목 단위 실패는 `UpdateOutcome`으로 기록되고 여기로 올라오지 않습니다.
#[derive(Debug, Error)]
pub enum CollectorError {
    /// 설정 에러 (네트워크 호출 전)
    #[error("Configuration error: {0}")]
    Config(String),

    /// 추적 종목 목록 조회 실패
    #[error("Listing error: {0}")]
    Listing(#[from] RegistryError),
}

impl CollectorError {
    /// 프로세스 종료 코드
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 1,
            Self::Listing(_) => 2,
        }
    }
}

/// Result 타입 별칭
pub type Result<T> = std::result::Result<T, CollectorError>;
