//! 환경변수 기반 설정 모듈.
//!
//! 필수 설정은 `NOTION_TOKEN`, `DATABASE_ID` 두 가지이며,
//! 없으면 네트워크 호출 없이 즉시 설정 에러로 종료합니다.

use crate::error::CollectorError;
use crate::Result;
use pricesync_data::provider::http::DEFAULT_USER_AGENT;
use pricesync_data::{NotionSettings, ProviderKind, SourceSettings};
use secrecy::SecretString;
use std::time::Duration;

/// 요청 간 딜레이 하한 (밀리초)
const MIN_REQUEST_DELAY_MS: u64 = 1_000;

/// 요청 간 딜레이 상한 (밀리초)
const MAX_REQUEST_DELAY_MS: u64 = 2_000;

/// Collector 전체 설정
#[derive(Debug)]
pub struct CollectorConfig {
    /// Notion 저장소 설정
    pub notion: NotionSettings,
    /// 시세 소스 설정
    pub source: SourceSettings,
    /// 동기화 설정
    pub sync: SyncConfig,
    /// 데몬 모드 설정
    pub daemon: DaemonConfig,
}

/// 동기화 설정
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// 종목 간 딜레이 (밀리초, 1000~2000)
    pub request_delay_ms: u64,
}

/// 데몬 모드 설정
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    /// 동기화 실행 주기 (분 단위)
    pub interval_minutes: u64,
}

impl CollectorConfig {
    /// 환경변수에서 설정 로드 (`.env` 포함)
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 키 조회 함수로 설정 로드
    ///
    /// 테스트에서 프로세스 환경변수를 건드리지 않고 설정을 구성할 때 사용합니다.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let token = get("NOTION_TOKEN");
        let database_id = get("DATABASE_ID");

        let (token, database_id) = match (token, database_id) {
            (Some(token), Some(database_id)) => (token, database_id),
            (token, database_id) => {
                let missing: Vec<&str> = [
                    token.is_none().then_some("NOTION_TOKEN"),
                    database_id.is_none().then_some("DATABASE_ID"),
                ]
                .into_iter()
                .flatten()
                .collect();

                return Err(CollectorError::Config(format!(
                    "필수 환경변수가 설정되지 않았습니다: {}",
                    missing.join(", ")
                )));
            }
        };

        let mut notion = NotionSettings::new(SecretString::from(token), database_id);
        if let Some(url) = get("NOTION_API_URL") {
            notion.api_url = url;
        }
        if let Some(name) = get("NOTION_TICKER_PROPERTY") {
            notion.ticker_property = name;
        }
        if let Some(name) = get("NOTION_PRICE_PROPERTY") {
            notion.price_property = name;
        }
        if let Some(name) = get("NOTION_UPDATED_PROPERTY") {
            notion.updated_property = name;
        }

        let provider = match get("SOURCE_PROVIDER") {
            Some(name) => name
                .parse::<ProviderKind>()
                .map_err(|e| CollectorError::Config(e.to_string()))?,
            None => ProviderKind::default(),
        };

        let source = SourceSettings {
            provider,
            url_template: get("SOURCE_URL_TEMPLATE"),
            selector: get("SOURCE_SELECTOR"),
            json_pointer: get("SOURCE_JSON_POINTER"),
            user_agent: get("SOURCE_USER_AGENT").unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            timeout: Duration::from_secs(parse_or(&get, "SOURCE_TIMEOUT_SECS", 15)),
        };

        Ok(Self {
            notion,
            source,
            sync: SyncConfig {
                request_delay_ms: parse_or(&get, "SYNC_REQUEST_DELAY_MS", 1_500),
            },
            daemon: DaemonConfig {
                interval_minutes: parse_or(&get, "DAEMON_INTERVAL_MINUTES", 60),
            },
        })
    }
}

impl SyncConfig {
    /// 종목 간 딜레이를 Duration으로 반환 (1~2초로 제한)
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(
            self.request_delay_ms
                .clamp(MIN_REQUEST_DELAY_MS, MAX_REQUEST_DELAY_MS),
        )
    }
}

impl DaemonConfig {
    /// 동기화 실행 주기를 Duration으로 반환 (최소 1분)
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_minutes.max(1) * 60)
    }
}

/// 값을 파싱 (없거나 실패 시 기본값 사용)
fn parse_or<T, G>(get: &G, key: &str, default: T) -> T
where
    T: std::str::FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "설정값 파싱 실패, 기본값 사용");
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_required_settings() {
        let err = CollectorConfig::from_lookup(lookup(&[])).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("NOTION_TOKEN"));
        assert!(msg.contains("DATABASE_ID"));

        let err =
            CollectorConfig::from_lookup(lookup(&[("DATABASE_ID", "db-1")])).unwrap_err();
        assert!(matches!(err, CollectorError::Config(ref m) if m.contains("NOTION_TOKEN")));
        assert!(!err.to_string().contains("DATABASE_ID"));
    }

    #[test]
    fn test_blank_credential_is_missing() {
        let err = CollectorConfig::from_lookup(lookup(&[
            ("NOTION_TOKEN", "   "),
            ("DATABASE_ID", "db-1"),
        ]))
        .unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_defaults() {
        let config = CollectorConfig::from_lookup(lookup(&[
            ("NOTION_TOKEN", "secret_abc"),
            ("DATABASE_ID", "db-1"),
        ]))
        .unwrap();

        assert_eq!(config.notion.database_id, "db-1");
        assert_eq!(config.notion.api_url, "https://api.notion.com");
        assert_eq!(config.notion.ticker_property, "Ticker");
        assert_eq!(config.notion.price_property, "Price");
        assert_eq!(config.notion.updated_property, "Last Updated");
        assert_eq!(config.source.provider, ProviderKind::Psx);
        assert_eq!(config.source.timeout, Duration::from_secs(15));
        assert_eq!(config.sync.request_delay(), Duration::from_millis(1_500));
        assert_eq!(config.daemon.interval(), Duration::from_secs(3_600));
    }

    #[test]
    fn test_overrides_and_clamping() {
        let config = CollectorConfig::from_lookup(lookup(&[
            ("NOTION_TOKEN", "secret_abc"),
            ("DATABASE_ID", "db-1"),
            ("NOTION_TICKER_PROPERTY", "Name"),
            ("SOURCE_PROVIDER", "sarmaaya"),
            ("SYNC_REQUEST_DELAY_MS", "50"),
            ("DAEMON_INTERVAL_MINUTES", "not-a-number"),
        ]))
        .unwrap();

        assert_eq!(config.notion.ticker_property, "Name");
        assert_eq!(config.source.provider, ProviderKind::Sarmaaya);
        assert_eq!(config.sync.request_delay(), Duration::from_millis(1_000));
        assert_eq!(config.daemon.interval_minutes, 60);

        let config = CollectorConfig::from_lookup(lookup(&[
            ("NOTION_TOKEN", "secret_abc"),
            ("DATABASE_ID", "db-1"),
            ("SYNC_REQUEST_DELAY_MS", "9000"),
        ]))
        .unwrap();
        assert_eq!(config.sync.request_delay(), Duration::from_millis(2_000));
    }

    #[test]
    fn test_unknown_provider() {
        let err = CollectorConfig::from_lookup(lookup(&[
            ("NOTION_TOKEN", "secret_abc"),
            ("DATABASE_ID", "db-1"),
            ("SOURCE_PROVIDER", "bloomberg"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("bloomberg"));
    }
}
