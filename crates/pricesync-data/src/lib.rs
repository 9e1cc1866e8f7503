//! 시세 소스와 추적 종목 저장소.
//!
//! 이 crate는 다음을 제공합니다:
//! - `QuoteSource`: 종목별 현재가 조회 (HTML 페이지 / JSON API)
//! - `Registry`: 추적 종목 목록 조회 및 가격 기록 (Notion 데이터베이스, 메모리)

pub mod provider;
pub mod registry;

// 시세 소스 재내보내기
pub use provider::{
    HtmlExtractor, HttpQuoteSource, JsonExtractor, PriceExtractor, ProviderKind, QuoteSource,
    SourceConfigError, SourceSettings,
};

// 저장소 재내보내기
pub use registry::{MemoryRegistry, MemoryRow, NotionRegistry, NotionSettings, Registry};
