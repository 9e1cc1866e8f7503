//! HTTP 기반 시세 소스.
//!
//! 종목별 URL 하나에 GET 요청을 보내고 설정된 추출 전략으로 가격을 읽습니다.
//!
//! ## 사용 예시
//! ```rust,ignore
//! let source = HttpQuoteSource::new(SourceSettings::preset(ProviderKind::Psx))?;
//! let quote = source.fetch("ENGRO").await?;
//! println!("ENGRO: {}", quote.value);
//! ```

use async_trait::async_trait;
use pricesync_core::{FetchError, PriceQuote};
use reqwest::Client;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use super::{HtmlExtractor, JsonExtractor, PriceExtractor, QuoteSource};

/// 기본 User-Agent (기본 클라이언트 식별자는 차단될 수 있음)
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// 요청 타임아웃 하한
pub const MIN_TIMEOUT: Duration = Duration::from_secs(10);

/// 요청 타임아웃 상한
pub const MAX_TIMEOUT: Duration = Duration::from_secs(15);

/// URL 템플릿의 티커 자리표시자
const TICKER_PLACEHOLDER: &str = "{ticker}";

/// 시세 소스 설정 에러
#[derive(Debug, Error)]
pub enum SourceConfigError {
    #[error("알 수 없는 시세 소스: {0} (psx, sarmaaya, json 중 하나)")]
    UnknownProvider(String),

    #[error("{provider} 소스에는 {setting} 설정이 필요합니다")]
    MissingSetting {
        provider: ProviderKind,
        setting: &'static str,
    },

    #[error("URL 템플릿에 {{ticker}} 자리표시자가 없습니다: {0}")]
    InvalidTemplate(String),

    #[error("가격 추출 설정 오류: {0}")]
    InvalidExtractor(String),

    #[error("HTTP 클라이언트 생성 실패: {0}")]
    Client(#[from] reqwest::Error),
}

/// 시세 소스 프리셋.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    /// PSX Data Portal (dps.psx.com.pk), HTML
    #[default]
    Psx,
    /// Sarmaaya (sarmaaya.pk), HTML
    Sarmaaya,
    /// 사용자 지정 JSON API
    Json,
}

impl ProviderKind {
    /// 기본 URL 템플릿
    pub fn default_url_template(&self) -> Option<&'static str> {
        match self {
            Self::Psx => Some("https://dps.psx.com.pk/company/{ticker}"),
            Self::Sarmaaya => Some("https://sarmaaya.pk/psx/company/{ticker}"),
            Self::Json => None,
        }
    }

    /// 기본 HTML 셀렉터
    pub fn default_selector(&self) -> Option<&'static str> {
        match self {
            Self::Psx => Some("div.stats_value"),
            Self::Sarmaaya => Some("span#quote_price"),
            Self::Json => None,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Psx => write!(f, "psx"),
            Self::Sarmaaya => write!(f, "sarmaaya"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = SourceConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "psx" | "dps" => Ok(Self::Psx),
            "sarmaaya" => Ok(Self::Sarmaaya),
            "json" => Ok(Self::Json),
            other => Err(SourceConfigError::UnknownProvider(other.to_string())),
        }
    }
}

/// 시세 소스 설정.
#[derive(Debug, Clone)]
pub struct SourceSettings {
    /// 프리셋
    pub provider: ProviderKind,
    /// URL 템플릿 (None이면 프리셋 기본값)
    pub url_template: Option<String>,
    /// HTML 셀렉터 (None이면 프리셋 기본값)
    pub selector: Option<String>,
    /// JSON pointer (json 소스 전용)
    pub json_pointer: Option<String>,
    /// User-Agent 헤더
    pub user_agent: String,
    /// 요청 타임아웃 (10~15초로 제한)
    pub timeout: Duration,
}

impl SourceSettings {
    /// 프리셋 기본값으로 생성
    pub fn preset(provider: ProviderKind) -> Self {
        Self {
            provider,
            url_template: None,
            selector: None,
            json_pointer: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: MAX_TIMEOUT,
        }
    }

    fn resolve_template(&self) -> Result<String, SourceConfigError> {
        let template = self
            .url_template
            .clone()
            .or_else(|| self.provider.default_url_template().map(str::to_string))
            .ok_or(SourceConfigError::MissingSetting {
                provider: self.provider,
                setting: "SOURCE_URL_TEMPLATE",
            })?;

        if !template.contains(TICKER_PLACEHOLDER) {
            return Err(SourceConfigError::InvalidTemplate(template));
        }

        Ok(template)
    }

    fn build_extractor(&self) -> Result<Box<dyn PriceExtractor>, SourceConfigError> {
        match self.provider {
            ProviderKind::Json => {
                let pointer =
                    self.json_pointer
                        .as_deref()
                        .ok_or(SourceConfigError::MissingSetting {
                            provider: self.provider,
                            setting: "SOURCE_JSON_POINTER",
                        })?;
                let extractor =
                    JsonExtractor::new(pointer).map_err(SourceConfigError::InvalidExtractor)?;
                Ok(Box::new(extractor))
            }
            ProviderKind::Psx | ProviderKind::Sarmaaya => {
                let selector = self
                    .selector
                    .as_deref()
                    .or(self.provider.default_selector())
                    .ok_or(SourceConfigError::MissingSetting {
                        provider: self.provider,
                        setting: "SOURCE_SELECTOR",
                    })?;
                let extractor =
                    HtmlExtractor::new(selector).map_err(SourceConfigError::InvalidExtractor)?;
                Ok(Box::new(extractor))
            }
        }
    }
}

/// 종목별 URL을 호출하는 시세 소스.
pub struct HttpQuoteSource {
    client: Client,
    provider: ProviderKind,
    url_template: String,
    extractor: Box<dyn PriceExtractor>,
}

impl HttpQuoteSource {
    /// 설정으로 생성. 타임아웃은 10~15초 범위로 맞춥니다.
    pub fn new(settings: SourceSettings) -> Result<Self, SourceConfigError> {
        let url_template = settings.resolve_template()?;
        let extractor = settings.build_extractor()?;

        let timeout = settings.timeout.clamp(MIN_TIMEOUT, MAX_TIMEOUT);
        if timeout != settings.timeout {
            tracing::warn!(
                requested = ?settings.timeout,
                applied = ?timeout,
                "요청 타임아웃을 허용 범위로 조정"
            );
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(settings.user_agent.as_str())
            .build()?;

        tracing::debug!(
            provider = %settings.provider,
            template = %url_template,
            extractor = extractor.kind(),
            "시세 소스 초기화"
        );

        Ok(Self {
            client,
            provider: settings.provider,
            url_template,
            extractor,
        })
    }

    /// 티커의 조회 URL
    pub fn url_for(&self, ticker: &str) -> String {
        self.url_template.replace(TICKER_PLACEHOLDER, ticker)
    }
}

#[async_trait]
impl QuoteSource for HttpQuoteSource {
    fn name(&self) -> &str {
        match self.provider {
            ProviderKind::Psx => "psx",
            ProviderKind::Sarmaaya => "sarmaaya",
            ProviderKind::Json => "json",
        }
    }

    async fn fetch(&self, ticker: &str) -> Result<PriceQuote, FetchError> {
        let url = self.url_for(ticker);
        tracing::debug!(ticker, url = %url, "시세 요청");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Exception {
                detail: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                tracing::warn!(ticker, "시세 소스 rate limit 응답");
            }
            return Err(FetchError::BadStatus {
                code: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| FetchError::Exception {
            detail: e.to_string(),
        })?;

        let value = self
            .extractor
            .extract(&body)
            .map_err(|detail| FetchError::Exception { detail })?
            .ok_or_else(|| FetchError::MissingOrUnparseable {
                ticker: ticker.to_string(),
            })?;

        Ok(PriceQuote::new(ticker, value))
    }
}
