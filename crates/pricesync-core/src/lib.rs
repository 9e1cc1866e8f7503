//! # PriceSync Core
//!
//! 주가 동기화 파이프라인의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 파이프라인 전반에서 사용되는 기본 타입을 제공합니다:
//! - 추적 대상 종목 (`TrackedEntity`) 및 시세 (`PriceQuote`)
//! - 종목별 처리 결과 (`UpdateOutcome`)
//! - 티커 정규화 및 가격 문자열 파싱
//! - 시세 조회/저장소 에러 타입
//! - 로깅 인프라

pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;
