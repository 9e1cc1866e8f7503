//! 실행 보고서.

use chrono::{DateTime, Utc};
use pricesync_core::{OutcomeStatus, UpdateOutcome};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::time::Duration;

use crate::CollectorError;

/// 실행 전체를 중단시킨 단계
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// 설정 검증 (네트워크 호출 전)
    Configuration,
    /// 추적 종목 목록 조회
    Listing,
}

impl From<&CollectorError> for FailureKind {
    fn from(err: &CollectorError) -> Self {
        match err {
            CollectorError::Config(_) => Self::Configuration,
            CollectorError::Listing(_) => Self::Listing,
        }
    }
}

/// 실행 중단 사유
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunFailure {
    pub kind: FailureKind,
    pub detail: String,
}

/// 상태별 건수
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub updated: usize,
    pub skipped_no_price: usize,
    pub skipped_no_ticker: usize,
    pub fetch_error: usize,
    pub update_error: usize,
}

impl StatusCounts {
    /// 상태의 건수
    pub fn get(&self, status: OutcomeStatus) -> usize {
        match status {
            OutcomeStatus::Updated => self.updated,
            OutcomeStatus::SkippedNoPrice => self.skipped_no_price,
            OutcomeStatus::SkippedNoTicker => self.skipped_no_ticker,
            OutcomeStatus::FetchError => self.fetch_error,
            OutcomeStatus::UpdateError => self.update_error,
        }
    }

    fn bump(&mut self, status: OutcomeStatus) {
        let slot = match status {
            OutcomeStatus::Updated => &mut self.updated,
            OutcomeStatus::SkippedNoPrice => &mut self.skipped_no_price,
            OutcomeStatus::SkippedNoTicker => &mut self.skipped_no_ticker,
            OutcomeStatus::FetchError => &mut self.fetch_error,
            OutcomeStatus::UpdateError => &mut self.update_error,
        };
        *slot += 1;
    }

    /// 건너뛴 종목 수
    pub fn skipped(&self) -> usize {
        self.skipped_no_price + self.skipped_no_ticker
    }

    /// 실패한 종목 수
    pub fn failed(&self) -> usize {
        self.fetch_error + self.update_error
    }
}

/// 한 번의 동기화 실행 보고서.
///
/// 처리한 모든 종목(건너뛴 종목 포함)의 결과를 목록 순서대로 담습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// 실행 시작 시각
    pub started_at: DateTime<Utc>,
    /// 종목별 결과 (처리 순서)
    pub outcomes: Vec<UpdateOutcome>,
    /// 실행 중단 사유
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<RunFailure>,
    /// 소요 시간
    #[serde(skip)]
    pub elapsed: Duration,
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}

/// JSON 출력용 (집계 포함)
#[derive(Serialize)]
struct ReportView<'a> {
    #[serde(flatten)]
    report: &'a RunReport,
    counts: StatusCounts,
    elapsed_secs: f64,
}

impl RunReport {
    /// 새 보고서 생성
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            outcomes: Vec::new(),
            failure: None,
            elapsed: Duration::ZERO,
        }
    }

    /// 중단된 실행의 보고서 생성
    pub fn aborted(kind: FailureKind, detail: impl Into<String>) -> Self {
        let mut report = Self::new();
        report.fail(kind, detail);
        report
    }

    /// 중단 에러로 보고서 생성
    pub fn from_error(err: &CollectorError) -> Self {
        Self::aborted(FailureKind::from(err), err.to_string())
    }

    /// 종목 결과 기록
    pub fn record(&mut self, outcome: UpdateOutcome) {
        self.outcomes.push(outcome);
    }

    /// 실행 중단 기록
    pub fn fail(&mut self, kind: FailureKind, detail: impl Into<String>) {
        self.failure = Some(RunFailure {
            kind,
            detail: detail.into(),
        });
    }

    /// 처리한 종목 수
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// 상태별 건수
    pub fn counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for outcome in &self.outcomes {
            counts.bump(outcome.status);
        }
        counts
    }

    /// 특정 상태의 결과
    pub fn with_status(&self, status: OutcomeStatus) -> impl Iterator<Item = &UpdateOutcome> {
        self.outcomes.iter().filter(move |o| o.status == status)
    }

    /// 설정/목록 단계에서 중단되었는지
    pub fn is_aborted(&self) -> bool {
        self.failure.is_some()
    }

    /// 목록이 비어 할 일이 없었는지 (에러 아님)
    pub fn is_nothing_to_do(&self) -> bool {
        !self.is_aborted() && self.outcomes.is_empty()
    }

    /// 성공률 계산 (%)
    pub fn success_rate(&self) -> f64 {
        if self.outcomes.is_empty() {
            0.0
        } else {
            (self.counts().updated as f64 / self.outcomes.len() as f64) * 100.0
        }
    }

    /// 프로세스 종료 코드 (0: 완료, 1: 설정 에러, 2: 목록 조회 실패)
    pub fn exit_code(&self) -> u8 {
        match self.failure.as_ref().map(|f| f.kind) {
            None => 0,
            Some(FailureKind::Configuration) => 1,
            Some(FailureKind::Listing) => 2,
        }
    }

    /// 요약 로그 출력
    pub fn log_summary(&self, operation: &str) {
        let counts = self.counts();

        if let Some(failure) = &self.failure {
            tracing::error!(
                operation = operation,
                stage = ?failure.kind,
                detail = %failure.detail,
                elapsed = format!("{:.1}s", self.elapsed.as_secs_f64()),
                "실행 중단"
            );
            return;
        }

        tracing::info!(
            operation = operation,
            total = self.total(),
            updated = counts.updated,
            skipped_no_price = counts.skipped_no_price,
            skipped_no_ticker = counts.skipped_no_ticker,
            fetch_error = counts.fetch_error,
            update_error = counts.update_error,
            success_rate = format!("{:.1}%", self.success_rate()),
            elapsed = format!("{:.1}s", self.elapsed.as_secs_f64()),
            "동기화 완료"
        );
    }

    /// 사람이 읽는 요약
    pub fn render(&self) -> String {
        let mut out = String::new();

        if let Some(failure) = &self.failure {
            let stage = match failure.kind {
                FailureKind::Configuration => "configuration",
                FailureKind::Listing => "listing",
            };
            let _ = writeln!(out, "Run aborted at {} stage: {}", stage, failure.detail);
            return out;
        }

        if self.outcomes.is_empty() {
            let _ = writeln!(out, "Nothing to do: no tracked rows.");
            return out;
        }

        let counts = self.counts();
        let _ = writeln!(
            out,
            "Processed {} rows in {:.1}s: {} updated, {} skipped, {} failed",
            self.total(),
            self.elapsed.as_secs_f64(),
            counts.updated,
            counts.skipped(),
            counts.failed()
        );
        for status in OutcomeStatus::ALL {
            let n = counts.get(status);
            if n > 0 {
                let _ = writeln!(out, "  {:<18} {}", status.as_str(), n);
            }
        }

        let _ = writeln!(out);
        for outcome in &self.outcomes {
            let ticker = match outcome.ticker.trim() {
                "" => "(empty)",
                t => t,
            };
            let _ = write!(out, "  [{}] {} ({})", outcome.status, ticker, outcome.row_id);
            if let Some(price) = outcome.price {
                let _ = write!(out, " price={}", price);
            }
            if let Some(detail) = &outcome.detail {
                let _ = write!(out, " - {}", detail);
            }
            let _ = writeln!(out);
        }

        out
    }

    /// 집계를 포함한 JSON
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&ReportView {
            report: self,
            counts: self.counts(),
            elapsed_secs: self.elapsed.as_secs_f64(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricesync_core::TrackedEntity;
    use rust_decimal_macros::dec;

    fn sample() -> RunReport {
        let engro = TrackedEntity::new("row-1", "ENGRO");
        let luck = TrackedEntity::new("row-2", "LUCK");
        let blank = TrackedEntity::new("row-3", "  ");

        let mut report = RunReport::new();
        report.record(UpdateOutcome::updated(&engro, "ENGRO", dec!(150.25)));
        report.record(UpdateOutcome::fetch_error(&luck, "LUCK", "exception: timeout"));
        report.record(UpdateOutcome::skipped_no_ticker(&blank));
        report
    }

    #[test]
    fn test_counts() {
        let report = sample();
        let counts = report.counts();

        assert_eq!(report.total(), 3);
        assert_eq!(counts.updated, 1);
        assert_eq!(counts.fetch_error, 1);
        assert_eq!(counts.skipped_no_ticker, 1);
        assert_eq!(counts.skipped(), 1);
        assert_eq!(counts.failed(), 1);
        assert_eq!(counts.get(OutcomeStatus::UpdateError), 0);
        assert_eq!(report.with_status(OutcomeStatus::Updated).count(), 1);
        assert!((report.success_rate() - 33.33).abs() < 0.01);
        assert_eq!(report.exit_code(), 0);
    }

    #[test]
    fn test_aborted_report() {
        let report = RunReport::from_error(&CollectorError::Config("NOTION_TOKEN".into()));

        assert!(report.is_aborted());
        assert!(!report.is_nothing_to_do());
        assert_eq!(report.exit_code(), 1);
        assert_eq!(report.counts(), StatusCounts::default());
        assert!(report.render().starts_with("Run aborted at configuration stage"));

        let report = RunReport::aborted(FailureKind::Listing, "query_failed: HTTP 500");
        assert_eq!(report.exit_code(), 2);
    }

    #[test]
    fn test_nothing_to_do() {
        let report = RunReport::new();
        assert!(report.is_nothing_to_do());
        assert_eq!(report.exit_code(), 0);
        assert_eq!(report.render(), "Nothing to do: no tracked rows.\n");
    }

    #[test]
    fn test_render_lists_every_outcome() {
        let text = sample().render();

        assert!(text.contains("Processed 3 rows"));
        assert!(text.contains("1 updated, 1 skipped, 1 failed"));
        assert!(text.contains("[updated] ENGRO (row-1) price=150.25"));
        assert!(text.contains("[fetch_error] LUCK (row-2) - exception: timeout"));
        assert!(text.contains("[skipped_no_ticker] (empty) (row-3)"));
    }

    #[test]
    fn test_json_includes_counts() {
        let json = sample().to_json_pretty().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["counts"]["updated"], 1);
        assert_eq!(value["outcomes"][0]["status"], "updated");
        assert_eq!(value["outcomes"][0]["price"], "150.25");
        assert!(value.get("failure").is_none());
    }
}
