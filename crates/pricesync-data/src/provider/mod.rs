//! 시세 Provider 모듈.
//!
//! 종목별 현재가를 원격 소스에서 가져옵니다.
//!
//! ## 구조
//! - `QuoteSource`: 티커 하나의 시세를 조회하는 공통 계약
//! - `HttpQuoteSource`: 종목별 URL에 GET 요청을 보내는 구현
//! - `PriceExtractor`: 응답 본문에서 가격 필드를 꺼내는 전략
//!   - `HtmlExtractor`: CSS 셀렉터로 HTML 요소 텍스트 추출
//!   - `JsonExtractor`: JSON pointer로 필드 추출
//!
//! 새 소스를 추가할 때는 `ProviderKind` 프리셋과 필요하면 추출 전략 하나만 추가합니다.

pub mod html;
pub mod http;
pub mod json;

use async_trait::async_trait;
use pricesync_core::{FetchError, PriceQuote};
use rust_decimal::Decimal;

pub use html::HtmlExtractor;
pub use http::{HttpQuoteSource, ProviderKind, SourceConfigError, SourceSettings};
pub use json::JsonExtractor;

/// 시세 소스 trait.
///
/// 구현체는 내부에서 재시도하지 않으며, 어떤 실패도 panic 없이 `FetchError`로 반환합니다.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// 소스 이름 (로그용).
    fn name(&self) -> &str;

    /// 정규화된 티커의 현재가 조회.
    ///
    /// 호출자는 비어 있지 않은 대문자 티커를 넘겨야 합니다.
    async fn fetch(&self, ticker: &str) -> Result<PriceQuote, FetchError>;
}

/// 응답 본문에서 가격을 꺼내는 전략.
pub trait PriceExtractor: Send + Sync {
    /// 전략 이름 (로그용).
    fn kind(&self) -> &'static str;

    /// 본문에서 가격 추출.
    ///
    /// - `Ok(Some(v))`: 숫자로 변환된 가격
    /// - `Ok(None)`: 필드 없음 / null / 숫자 아님
    /// - `Err(msg)`: 본문 자체를 해석할 수 없음
    fn extract(&self, body: &str) -> Result<Option<Decimal>, String>;
}
