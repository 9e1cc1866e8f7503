//! 가격 문자열 파싱.
//!
//! 시세 페이지의 가격은 `1,250.50`, `Rs. 150.25` 처럼 천 단위 구분자나
//! 통화 표기가 붙어 있으므로 숫자 변환 전에 제거합니다.

use rust_decimal::Decimal;
use std::str::FromStr;

/// 가격 앞에 붙는 통화 표기 (긴 것부터 검사)
const CURRENCY_PREFIXES: [&str; 3] = ["PKR", "Rs.", "Rs"];

/// 가격 텍스트를 Decimal로 변환합니다.
///
/// 부호는 검사하지 않습니다. 0 이하 값의 처리는 호출자(검증 단계)의 몫입니다.
///
/// # Examples
/// ```
/// use pricesync_core::parse_price_text;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_price_text("1,250.50"), Some(Decimal::new(125050, 2)));
/// assert_eq!(parse_price_text("—"), None);
/// ```
pub fn parse_price_text(text: &str) -> Option<Decimal> {
    let mut body = text.trim();
    for prefix in CURRENCY_PREFIXES {
        if let Some(rest) = body.strip_prefix(prefix) {
            body = rest.trim_start();
            break;
        }
    }

    let cleaned: String = body
        .chars()
        .filter(|c| *c != ',' && *c != '\u{a0}' && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    Decimal::from_str(&cleaned).ok()
}
