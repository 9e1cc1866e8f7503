//! NotionRegistry integration tests against a local mock server.

use chrono::{TimeZone, Utc};
use mockito::Matcher;
use pricesync_core::RegistryError;
use pricesync_data::{NotionRegistry, NotionSettings, Registry};
use rust_decimal_macros::dec;
use secrecy::SecretString;
use serde_json::json;

fn registry(base_url: &str) -> NotionRegistry {
    let mut settings = NotionSettings::new(SecretString::from("secret_abc".to_string()), "db-123");
    settings.api_url = base_url.to_string();
    NotionRegistry::new(settings).expect("registry should build")
}

fn ticker_row(id: &str, ticker: &str) -> serde_json::Value {
    json!({
        "object": "page",
        "id": id,
        "properties": {
            "Ticker": {
                "id": "abc",
                "type": "rich_text",
                "rich_text": [{"type": "text", "text": {"content": ticker}, "plain_text": ticker}]
            },
            "Price": {"id": "def", "type": "number", "number": null}
        }
    })
}

#[tokio::test]
async fn test_list_single_page() {
    let mut server = mockito::Server::new_async().await;
    let body = json!({
        "object": "list",
        "results": [
            ticker_row("page-1", "ENGRO"),
            ticker_row("page-2", "luck"),
            {
                "object": "page",
                "id": "page-3",
                "properties": {
                    "Ticker": {"id": "abc", "type": "rich_text", "rich_text": []}
                }
            }
        ],
        "has_more": false,
        "next_cursor": null
    });
    let mock = server
        .mock("POST", "/v1/databases/db-123/query")
        .match_header("authorization", "Bearer secret_abc")
        .match_header("notion-version", "2022-06-28")
        .match_body(Matcher::Json(json!({"page_size": 100})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await;

    let entities = registry(&server.url()).list().await.expect("list");

    assert_eq!(entities.len(), 3);
    assert_eq!(entities[0].row_id, "page-1");
    assert_eq!(entities[0].ticker, "ENGRO");
    // 정규화는 호출자 몫
    assert_eq!(entities[1].ticker, "luck");
    // 빈 티커 행은 버리지 않는다
    assert_eq!(entities[2].row_id, "page-3");
    assert_eq!(entities[2].ticker, "");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_list_follows_cursor() {
    let mut server = mockito::Server::new_async().await;
    let first = server
        .mock("POST", "/v1/databases/db-123/query")
        .match_body(Matcher::Json(json!({"page_size": 100})))
        .with_status(200)
        .with_body(
            json!({
                "results": [ticker_row("page-1", "ENGRO")],
                "has_more": true,
                "next_cursor": "cursor-2"
            })
            .to_string(),
        )
        .create_async()
        .await;
    let second = server
        .mock("POST", "/v1/databases/db-123/query")
        .match_body(Matcher::Json(
            json!({"page_size": 100, "start_cursor": "cursor-2"}),
        ))
        .with_status(200)
        .with_body(
            json!({
                "results": [ticker_row("page-2", "LUCK")],
                "has_more": false,
                "next_cursor": null
            })
            .to_string(),
        )
        .create_async()
        .await;

    let entities = registry(&server.url()).list().await.expect("list");

    let tickers: Vec<&str> = entities.iter().map(|e| e.ticker.as_str()).collect();
    assert_eq!(tickers, vec!["ENGRO", "LUCK"]);
    first.assert_async().await;
    second.assert_async().await;
}

#[tokio::test]
async fn test_list_failure_status() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/databases/db-123/query")
        .with_status(401)
        .with_body(r#"{"object":"error","status":401,"code":"unauthorized"}"#)
        .create_async()
        .await;

    let err = registry(&server.url()).list().await.unwrap_err();

    match err {
        RegistryError::QueryFailed { detail } => {
            assert!(detail.contains("401"), "detail: {}", detail);
            assert!(detail.contains("unauthorized"), "detail: {}", detail);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_list_malformed_body() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/databases/db-123/query")
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let err = registry(&server.url()).list().await.unwrap_err();
    assert_eq!(err.reason(), "query_failed");
}

#[tokio::test]
async fn test_update_sets_price_and_timestamp() {
    let mut server = mockito::Server::new_async().await;
    let as_of = Utc.with_ymd_and_hms(2024, 3, 1, 10, 30, 0).unwrap();
    let mock = server
        .mock("PATCH", "/v1/pages/page-1")
        .match_header("authorization", "Bearer secret_abc")
        .match_body(Matcher::Json(json!({
            "properties": {
                "Price": {"number": 150.25},
                "Last Updated": {"date": {"start": "2024-03-01T10:30:00+00:00"}}
            }
        })))
        .with_status(200)
        .with_body(r#"{"object":"page","id":"page-1"}"#)
        .create_async()
        .await;

    registry(&server.url())
        .update("page-1", dec!(150.25), as_of)
        .await
        .expect("update");

    mock.assert_async().await;
}

#[tokio::test]
async fn test_update_failure_status() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("PATCH", "/v1/pages/page-1")
        .with_status(409)
        .with_body(r#"{"object":"error","code":"conflict_error"}"#)
        .create_async()
        .await;

    let err = registry(&server.url())
        .update("page-1", dec!(10), Utc::now())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        RegistryError::UpdateFailed {
            code: Some(409),
            ..
        }
    ));
}

#[tokio::test]
async fn test_update_requires_ok_status() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("PATCH", "/v1/pages/page-1")
        .with_status(202)
        .create_async()
        .await;

    let err = registry(&server.url())
        .update("page-1", dec!(10), Utc::now())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        RegistryError::UpdateFailed {
            code: Some(202),
            ..
        }
    ));
}
