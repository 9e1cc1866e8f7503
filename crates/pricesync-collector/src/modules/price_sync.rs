//! 가격 동기화 모듈.
//!
//! 실행 흐름: `Start → Listing → (종목별: Fetching → Validating → Updating) → Done`
//!
//! - 설정 에러와 목록 조회 실패만 실행 전체를 중단시킵니다.
//! - 종목 단위 실패는 결과로 기록하고 다음 종목으로 넘어갑니다.
//! - 실행 안에서는 재시도하지 않습니다. 다음 예약 실행이 재시도입니다.
//! - 종목은 하나씩 순서대로 처리하고, 종목 사이에 고정 딜레이를 둡니다.
//!   딜레이는 결과와 무관하게 적용하되, 네트워크 호출이 없었던 `skipped_no_ticker` 행 뒤와
//!   마지막 종목 뒤에는 두지 않습니다.

use chrono::Utc;
use pricesync_core::{OutcomeStatus, TrackedEntity, UpdateOutcome};
use pricesync_data::{HttpQuoteSource, NotionRegistry, QuoteSource, Registry};
use std::time::{Duration, Instant};

use crate::{CollectorConfig, CollectorError, Result, RunReport};

/// 운영 구성 (HTTP 시세 소스 + Notion 저장소)
pub type HttpPriceSync = PriceSync<HttpQuoteSource, NotionRegistry>;

/// 설정 로드부터 완료까지 한 번 실행합니다.
///
/// 설정이 잘못되면 네트워크 호출 없이 configuration 중단 보고서를 반환합니다.
pub async fn sync_once<F>(lookup: F) -> RunReport
where
    F: Fn(&str) -> Option<String>,
{
    let syncer = match CollectorConfig::from_lookup(lookup).and_then(HttpPriceSync::from_config) {
        Ok(syncer) => syncer,
        Err(e) => {
            tracing::error!(error = %e, "설정 검증 실패, 실행 중단");
            return RunReport::from_error(&e);
        }
    };

    syncer.run().await
}

/// 가격 동기화 실행기.
pub struct PriceSync<S, R> {
    source: S,
    registry: R,
    request_delay: Duration,
}

impl HttpPriceSync {
    /// 설정으로 시세 소스와 저장소를 구성합니다 (Start 단계).
    ///
    /// 네트워크 호출은 하지 않습니다.
    pub fn from_config(config: CollectorConfig) -> Result<Self> {
        let request_delay = config.sync.request_delay();

        let source = HttpQuoteSource::new(config.source)
            .map_err(|e| CollectorError::Config(e.to_string()))?;
        let registry = NotionRegistry::new(config.notion)
            .map_err(|e| CollectorError::Config(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        Ok(Self::new(source, registry, request_delay))
    }
}

impl<S, R> PriceSync<S, R>
where
    S: QuoteSource,
    R: Registry,
{
    pub fn new(source: S, registry: R, request_delay: Duration) -> Self {
        Self {
            source,
            registry,
            request_delay,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// 한 번의 동기화 실행.
    ///
    /// 목록 조회 실패는 보고서의 `failure`로, 종목 단위 실패는 `outcomes`로 기록됩니다.
    pub async fn run(&self) -> RunReport {
        let start = Instant::now();
        let mut report = RunReport::new();

        tracing::info!(
            source = self.source.name(),
            registry = self.registry.name(),
            "가격 동기화 시작"
        );

        let entities = match self.list_entities().await {
            Ok(entities) => entities,
            Err(e) => {
                tracing::error!(error = %e, "추적 종목 목록 조회 실패, 실행 중단");
                report = RunReport::from_error(&e);
                report.elapsed = start.elapsed();
                return report;
            }
        };

        if entities.is_empty() {
            tracing::warn!("동기화할 종목이 없습니다");
            report.elapsed = start.elapsed();
            return report;
        }

        let total = entities.len();
        tracing::info!(count = total, "추적 종목 조회 완료");

        for (idx, entity) in entities.iter().enumerate() {
            let progress = format!("{}/{}", idx + 1, total);
            let outcome = self.process(entity, &progress).await;
            let touched_network = outcome.status != OutcomeStatus::SkippedNoTicker;

            log_outcome(&outcome, &progress);
            report.record(outcome);

            // Rate limiting
            if touched_network && idx + 1 < total {
                tokio::time::sleep(self.request_delay).await;
            }
        }

        report.elapsed = start.elapsed();
        report
    }

    async fn list_entities(&self) -> Result<Vec<TrackedEntity>> {
        Ok(self.registry.list().await?)
    }

    /// 종목 하나 처리: 티커 정규화 → 시세 조회 → 검증 → 기록
    async fn process(&self, entity: &TrackedEntity, progress: &str) -> UpdateOutcome {
        let Some(ticker) = entity.normalized_ticker() else {
            return UpdateOutcome::skipped_no_ticker(entity);
        };

        tracing::debug!(ticker = %ticker, row_id = %entity.row_id, progress, "시세 조회 시작");

        let quote = match self.source.fetch(&ticker).await {
            Ok(quote) => quote,
            Err(e) => return UpdateOutcome::fetch_error(entity, &ticker, e.to_string()),
        };

        if !quote.is_valid() {
            return UpdateOutcome::skipped_no_price(entity, &ticker, quote.value);
        }

        match self
            .registry
            .update(&entity.row_id, quote.value, Utc::now())
            .await
        {
            Ok(()) => UpdateOutcome::updated(entity, &ticker, quote.value),
            Err(e) => UpdateOutcome::update_error(entity, &ticker, quote.value, e.to_string()),
        }
    }
}

fn log_outcome(outcome: &UpdateOutcome, progress: &str) {
    let ticker = outcome.ticker.as_str();
    let row_id = outcome.row_id.as_str();
    let detail = outcome.detail.as_deref().unwrap_or_default();

    match outcome.status {
        OutcomeStatus::Updated => {
            let price = outcome.price.map(|p| p.to_string()).unwrap_or_default();
            tracing::info!(ticker, row_id, price = %price, progress, "가격 갱신 완료");
        }
        OutcomeStatus::SkippedNoTicker => {
            tracing::warn!(row_id, progress, "티커가 비어 있어 건너뜀");
        }
        OutcomeStatus::SkippedNoPrice => {
            tracing::warn!(ticker, row_id, detail, progress, "유효한 가격 없음, 건너뜀");
        }
        OutcomeStatus::FetchError => {
            tracing::error!(ticker, row_id, error = detail, progress, "시세 조회 실패");
        }
        OutcomeStatus::UpdateError => {
            tracing::error!(ticker, row_id, error = detail, progress, "저장소 갱신 실패");
        }
    }
}
