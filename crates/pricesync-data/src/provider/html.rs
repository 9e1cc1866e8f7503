//! HTML 요소 기반 가격 추출.
//!
//! 시세 페이지에서 가격을 담은 요소 하나를 CSS 셀렉터로 찾아 텍스트를 파싱합니다.
//!
//! | 소스              | 셀렉터              |
//! |-------------------|---------------------|
//! | PSX Data Portal   | `div.stats_value`   |
//! | Sarmaaya          | `span#quote_price`  |

use pricesync_core::parse_price_text;
use rust_decimal::Decimal;
use scraper::{Html, Selector};

use super::PriceExtractor;

/// CSS 셀렉터로 가격 요소를 찾는 추출기.
///
/// 셀렉터와 일치하는 첫 번째 요소만 사용합니다.
pub struct HtmlExtractor {
    selector: Selector,
    selector_text: String,
}

impl HtmlExtractor {
    /// 셀렉터 문자열로 생성. 셀렉터 문법이 잘못되면 에러 메시지를 반환합니다.
    pub fn new(selector: &str) -> Result<Self, String> {
        let parsed = Selector::parse(selector)
            .map_err(|e| format!("잘못된 CSS 셀렉터 '{}': {:?}", selector, e))?;

        Ok(Self {
            selector: parsed,
            selector_text: selector.to_string(),
        })
    }
}

impl std::fmt::Debug for HtmlExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HtmlExtractor")
            .field("selector", &self.selector_text)
            .finish()
    }
}

impl PriceExtractor for HtmlExtractor {
    fn kind(&self) -> &'static str {
        "html"
    }

    fn extract(&self, body: &str) -> Result<Option<Decimal>, String> {
        let document = Html::parse_document(body);

        let price = document.select(&self.selector).next().and_then(|el| {
            let text = el.text().collect::<String>();
            parse_price_text(&text)
        });

        Ok(price)
    }
}
