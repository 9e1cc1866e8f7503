//! Notion 데이터베이스 저장소.
//!
//! # 데이터베이스 구조
//!
//! | 속성           | 타입                  | 용도                 |
//! |----------------|-----------------------|----------------------|
//! | `Ticker`       | title 또는 rich_text  | 종목 코드 (예: ENGRO) |
//! | `Price`        | number                | 현재가               |
//! | `Last Updated` | date                  | 갱신 시각            |
//!
//! 속성 이름은 `NotionSettings`로 바꿀 수 있습니다.
//!
//! # API
//!
//! - 목록: `POST /v1/databases/{database_id}/query` (cursor 페이지네이션)
//! - 갱신: `PATCH /v1/pages/{page_id}`

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pricesync_core::{RegistryError, TrackedEntity};
use reqwest::{Client, StatusCode};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::time::Duration;

use super::Registry;

/// Notion API 기본 URL
pub const DEFAULT_API_URL: &str = "https://api.notion.com";

/// 사용하는 Notion API 버전
pub const NOTION_VERSION: &str = "2022-06-28";

/// 한 번의 query 요청에서 받을 행 수 (API 최대값)
const PAGE_SIZE: u32 = 100;

/// cursor 순환에 대비한 최대 페이지 수
const MAX_PAGES: usize = 100;

/// 에러 메시지에 포함할 응답 본문 길이
const ERROR_BODY_LIMIT: usize = 300;

/// Notion 저장소 설정.
#[derive(Debug)]
pub struct NotionSettings {
    /// Integration 토큰
    pub token: SecretString,
    /// 데이터베이스 ID
    pub database_id: String,
    /// API 기본 URL
    pub api_url: String,
    /// 티커 속성 이름
    pub ticker_property: String,
    /// 가격 속성 이름
    pub price_property: String,
    /// 갱신 시각 속성 이름
    pub updated_property: String,
}

impl NotionSettings {
    /// 기본 속성 이름으로 생성
    pub fn new(token: SecretString, database_id: impl Into<String>) -> Self {
        Self {
            token,
            database_id: database_id.into(),
            api_url: DEFAULT_API_URL.to_string(),
            ticker_property: "Ticker".to_string(),
            price_property: "Price".to_string(),
            updated_property: "Last Updated".to_string(),
        }
    }
}

/// Query API 응답.
#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    results: Vec<PageObject>,
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    next_cursor: Option<String>,
}

/// 데이터베이스 행 (page).
#[derive(Debug, Deserialize)]
struct PageObject {
    id: String,
    #[serde(default)]
    properties: HashMap<String, Value>,
}

/// Notion 데이터베이스 저장소.
pub struct NotionRegistry {
    client: Client,
    settings: NotionSettings,
}

impl NotionRegistry {
    /// 새 저장소 생성.
    pub fn new(settings: NotionSettings) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self { client, settings })
    }

    fn base_url(&self) -> &str {
        self.settings.api_url.trim_end_matches('/')
    }

    /// 한 페이지 조회
    async fn query_page(&self, cursor: Option<&str>) -> Result<QueryResponse, RegistryError> {
        let url = format!(
            "{}/v1/databases/{}/query",
            self.base_url(),
            self.settings.database_id
        );

        let mut body = json!({ "page_size": PAGE_SIZE });
        if let Some(cursor) = cursor {
            body["start_cursor"] = Value::String(cursor.to_string());
        }

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.settings.token.expose_secret())
            .header("Notion-Version", NOTION_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| RegistryError::QueryFailed {
                detail: format!("요청 실패: {}", e),
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(RegistryError::QueryFailed {
                detail: format!("HTTP {}: {}", status.as_u16(), truncate(&text)),
            });
        }

        response
            .json::<QueryResponse>()
            .await
            .map_err(|e| RegistryError::QueryFailed {
                detail: format!("응답 파싱 실패: {}", e),
            })
    }

    /// 행에서 티커 텍스트 추출. 없으면 빈 문자열.
    fn ticker_of(&self, page: &PageObject) -> String {
        page.properties
            .get(&self.settings.ticker_property)
            .map(rich_text_content)
            .unwrap_or_default()
    }

    fn update_body(&self, price: Decimal, as_of: DateTime<Utc>) -> Result<Value, RegistryError> {
        let number = price.to_f64().ok_or_else(|| RegistryError::UpdateFailed {
            code: None,
            detail: format!("가격을 숫자로 변환할 수 없음: {}", price),
        })?;

        let mut properties = Map::new();
        properties.insert(
            self.settings.price_property.clone(),
            json!({ "number": number }),
        );
        properties.insert(
            self.settings.updated_property.clone(),
            json!({ "date": { "start": as_of.to_rfc3339() } }),
        );

        Ok(json!({ "properties": properties }))
    }
}

#[async_trait]
impl Registry for NotionRegistry {
    fn name(&self) -> &str {
        "notion"
    }

    async fn list(&self) -> Result<Vec<TrackedEntity>, RegistryError> {
        let mut entities = Vec::new();
        let mut cursor: Option<String> = None;

        for page_no in 1..=MAX_PAGES {
            let page = self.query_page(cursor.as_deref()).await?;

            tracing::debug!(
                page = page_no,
                rows = page.results.len(),
                has_more = page.has_more,
                "Notion query 페이지 수신"
            );

            entities.extend(
                page.results
                    .iter()
                    .map(|row| TrackedEntity::new(row.id.clone(), self.ticker_of(row))),
            );

            match (page.has_more, page.next_cursor) {
                (true, Some(next)) => cursor = Some(next),
                _ => return Ok(entities),
            }
        }

        Err(RegistryError::QueryFailed {
            detail: format!("페이지 수가 {}개를 초과했습니다", MAX_PAGES),
        })
    }

    async fn update(
        &self,
        row_id: &str,
        price: Decimal,
        as_of: DateTime<Utc>,
    ) -> Result<(), RegistryError> {
        let url = format!("{}/v1/pages/{}", self.base_url(), row_id);
        let body = self.update_body(price, as_of)?;

        let response = self
            .client
            .patch(&url)
            .bearer_auth(self.settings.token.expose_secret())
            .header("Notion-Version", NOTION_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| RegistryError::UpdateFailed {
                code: None,
                detail: e.to_string(),
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            let text = response.text().await.unwrap_or_default();
            return Err(RegistryError::UpdateFailed {
                code: Some(status.as_u16()),
                detail: truncate(&text),
            });
        }

        Ok(())
    }
}

/// title / rich_text 속성의 텍스트 조각을 이어 붙입니다.
///
/// `{"type": "title", "title": [{"plain_text": "ENGRO", "text": {"content": "ENGRO"}}]}`
fn rich_text_content(property: &Value) -> String {
    let segments = property
        .get("title")
        .or_else(|| property.get("rich_text"))
        .and_then(Value::as_array);

    let Some(segments) = segments else {
        return String::new();
    };

    segments
        .iter()
        .filter_map(|segment| {
            segment
                .get("plain_text")
                .and_then(Value::as_str)
                .or_else(|| segment.pointer("/text/content").and_then(Value::as_str))
        })
        .collect()
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= ERROR_BODY_LIMIT {
        text.to_string()
    } else {
        let head: String = text.chars().take(ERROR_BODY_LIMIT).collect();
        format!("{}...", head)
    }
}
