//! JSON 필드 기반 가격 추출.

use pricesync_core::parse_price_text;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

use super::PriceExtractor;

/// JSON pointer(RFC 6901)로 가격 필드를 찾는 추출기.
///
/// 필드는 숫자(`150.25`)이거나 숫자 문자열(`"1,250.50"`)일 수 있습니다.
#[derive(Debug, Clone)]
pub struct JsonExtractor {
    pointer: String,
}

impl JsonExtractor {
    /// JSON pointer로 생성.
    ///
    /// `data.price` 처럼 점으로 구분된 경로도 `/data/price`로 변환해 받습니다.
    pub fn new(path: &str) -> Result<Self, String> {
        let path = path.trim();
        if path.is_empty() {
            return Err("JSON pointer가 비어 있습니다".to_string());
        }

        let pointer = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path.replace('.', "/"))
        };

        Ok(Self { pointer })
    }

    /// 정규화된 JSON pointer
    pub fn pointer(&self) -> &str {
        &self.pointer
    }
}

impl PriceExtractor for JsonExtractor {
    fn kind(&self) -> &'static str {
        "json"
    }

    fn extract(&self, body: &str) -> Result<Option<Decimal>, String> {
        let document: Value =
            serde_json::from_str(body).map_err(|e| format!("JSON 파싱 실패: {}", e))?;

        let price = match document.pointer(&self.pointer) {
            Some(Value::Number(n)) => Decimal::from_str(&n.to_string())
                .ok()
                .or_else(|| n.as_f64().and_then(Decimal::from_f64)),
            Some(Value::String(s)) => parse_price_text(s),
            _ => None,
        };

        Ok(price)
    }
}
