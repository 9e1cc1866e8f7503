//! Standalone price sync runner.
//!
//! 이 crate는 저장소의 추적 종목 가격을 갱신하는 바이너리를 제공합니다:
//! - 추적 종목 목록 조회 (Notion 데이터베이스)
//! - 종목별 현재가 조회 (PSX Data Portal, Sarmaaya, JSON API)
//! - 가격/갱신 시각 기록 및 실행 보고서

pub mod config;
pub mod error;
pub mod modules;
pub mod report;

pub use config::CollectorConfig;
pub use error::{CollectorError, Result};
pub use report::{FailureKind, RunFailure, RunReport, StatusCounts};
