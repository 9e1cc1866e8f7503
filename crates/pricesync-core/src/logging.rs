//! tracing을 사용한 로깅 인프라.
//!
//! 동기화 실행은 주로 스케줄러(cron, CI 워크플로우)에서 호출되므로
//! 사람이 읽는 형식과 로그 수집용 JSON 형식을 모두 지원합니다:
//! - **pretty**: 로컬 실행용 여러 줄 형식
//! - **json**: 로그 집계용 JSON 형식
//! - **compact**: 스케줄러 콘솔용 한 줄 형식

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 필터 지시자를 받을 이 워크스페이스의 target 목록 (바이너리 `pricesync` 포함).
const WORKSPACE_TARGETS: [&str; 4] = [
    "pricesync",
    "pricesync_core",
    "pricesync_data",
    "pricesync_collector",
];

/// 로그 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// 색상이 포함된 사람이 읽기 쉬운 형식
    Pretty,
    /// 로그 집계용 JSON 형식
    Json,
    /// 간결한 한 줄 형식 (기본값)
    #[default]
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// 로그 레벨 (예: "info", "debug")
    ///
    /// `=`를 포함하면 완전한 필터 지시자로 그대로 사용합니다.
    pub level: String,
    /// 출력 형식
    pub format: LogFormat,
    /// 파일명과 줄 번호 포함 여부
    pub with_file: bool,
    /// 대상(모듈 경로) 포함 여부
    pub with_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
            with_file: false,
            with_target: true,
        }
    }
}

impl LogConfig {
    /// 새 로그 설정을 생성합니다.
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            ..Default::default()
        }
    }

    /// 로그 형식을 설정합니다.
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// 환경 변수에서 설정을 생성합니다.
    ///
    /// 레벨에는 `RUST_LOG`를, 형식에는 `LOG_FORMAT`을 사용합니다.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 키 조회 함수로 설정을 생성합니다.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let level = lookup("RUST_LOG")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "info".to_string());
        let format = lookup("LOG_FORMAT")
            .and_then(|s| s.parse().ok())
            .unwrap_or_default();

        Self {
            level,
            format,
            ..Default::default()
        }
    }

    /// CLI 플래그로 지정된 값만 덮어씁니다.
    pub fn with_overrides(mut self, level: Option<String>, format: Option<LogFormat>) -> Self {
        if let Some(level) = level {
            self.level = level;
        }
        if let Some(format) = format {
            self.format = format;
        }
        self
    }

    /// EnvFilter 지시자 문자열.
    ///
    /// 단순 레벨("debug")은 워크스페이스 crate에만 적용해
    /// reqwest/hyper 등 의존성 로그가 섞이지 않게 합니다.
    pub fn filter_directive(&self) -> String {
        let level = self.level.trim();
        if level.contains('=') || level.contains(',') {
            return level.to_string();
        }

        WORKSPACE_TARGETS
            .iter()
            .map(|target| format!("{}={}", target, level))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// 주어진 설정으로 로깅 시스템을 초기화합니다.
///
/// `RUST_LOG`가 설정되어 있으면 설정의 레벨보다 우선합니다.
///
/// # 예제
///
/// ```no_run
/// use pricesync_core::logging::{init_logging, LogConfig, LogFormat};
///
/// init_logging(LogConfig::new("debug").with_format(LogFormat::Json)).unwrap();
/// ```
pub fn init_logging(config: LogConfig) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.filter_directive()))?;

    match config.format {
        LogFormat::Pretty => {
            let fmt_layer = fmt::layer()
                .pretty()
                .with_file(config.with_file)
                .with_line_number(config.with_file)
                .with_target(config.with_target);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
        LogFormat::Json => {
            let fmt_layer = fmt::layer()
                .json()
                .with_file(config.with_file)
                .with_line_number(config.with_file)
                .with_target(config.with_target);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
        LogFormat::Compact => {
            let fmt_layer = fmt::layer()
                .compact()
                .with_file(config.with_file)
                .with_line_number(config.with_file)
                .with_target(config.with_target);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
    }

    tracing::debug!(
        format = ?config.format,
        filter = %config.filter_directive(),
        "Logging initialized"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!(" compact ".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_filter_directive_scopes_plain_level() {
        let config = LogConfig::new("debug");
        assert_eq!(
            config.filter_directive(),
            "pricesync=debug,pricesync_core=debug,pricesync_data=debug,pricesync_collector=debug"
        );
    }

    #[test]
    fn test_plain_level_admits_binary_and_library_targets() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;
        use tracing_subscriber::layer::Context;
        use tracing_subscriber::Layer;

        struct CountingLayer(Arc<AtomicUsize>);

        impl<S: tracing::Subscriber> Layer<S> for CountingLayer {
            fn on_event(&self, _event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        let seen = Arc::new(AtomicUsize::new(0));
        let filter = EnvFilter::try_new(LogConfig::new("info").filter_directive()).unwrap();
        let subscriber = tracing_subscriber::registry()
            .with(filter)
            .with(CountingLayer(Arc::clone(&seen)));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(target: "pricesync", "binary event");
            tracing::info!(target: "pricesync_collector::report", "library event");
            tracing::info!(target: "hyper::client", "dependency event");
            tracing::debug!(target: "pricesync", "below level");
        });

        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_from_lookup_reads_log_format() {
        let config = LogConfig::from_lookup(|key| match key {
            "LOG_FORMAT" => Some("json".to_string()),
            _ => None,
        });
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.level, "info");

        let config = LogConfig::from_lookup(|key| match key {
            "LOG_FORMAT" => Some("xml".to_string()),
            "RUST_LOG" => Some("debug".to_string()),
            _ => None,
        });
        assert_eq!(config.format, LogFormat::Compact);
        assert_eq!(config.level, "debug");
    }

    #[test]
    fn test_cli_overrides_beat_environment() {
        let from_env = LogConfig::from_lookup(|key| match key {
            "LOG_FORMAT" => Some("json".to_string()),
            _ => None,
        });

        let kept = from_env.clone().with_overrides(None, None);
        assert_eq!(kept.format, LogFormat::Json);
        assert_eq!(kept.level, "info");

        let overridden = from_env.with_overrides(Some("warn".to_string()), Some(LogFormat::Pretty));
        assert_eq!(overridden.format, LogFormat::Pretty);
        assert_eq!(overridden.level, "warn");
    }

    #[test]
    fn test_filter_directive_passes_full_directive() {
        let config = LogConfig::new("info,reqwest=debug").with_format(LogFormat::Json);
        assert_eq!(config.filter_directive(), "info,reqwest=debug");
        assert_eq!(config.format, LogFormat::Json);
    }
}
