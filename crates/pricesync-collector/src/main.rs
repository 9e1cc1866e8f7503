//! Standalone price sync CLI.

use clap::{Parser, Subcommand};
use pricesync_collector::modules::{self, HttpPriceSync};
use pricesync_collector::{CollectorConfig, RunReport};
use pricesync_core::logging::{init_logging, LogConfig, LogFormat};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "pricesync")]
#[command(about = "Sync latest stock prices into a Notion database", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 로그 레벨 (trace, debug, info, warn, error). 없으면 RUST_LOG, 기본 info
    #[arg(long)]
    log_level: Option<String>,

    /// 로그 형식 (pretty, json, compact). 없으면 LOG_FORMAT, 기본 compact
    #[arg(long)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// 가격 동기화 1회 실행
    Sync {
        /// 보고서를 JSON으로 출력
        #[arg(long)]
        json: bool,
    },

    /// 데몬 모드: 주기적으로 가격 동기화 실행
    Daemon,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    let log_config = LogConfig::from_env().with_overrides(cli.log_level, cli.log_format);
    if let Err(e) = init_logging(log_config) {
        eprintln!("로깅 초기화 실패: {}", e);
        return ExitCode::FAILURE;
    }

    tracing::info!("PriceSync 시작");

    let code = match cli.command {
        Commands::Sync { json } => {
            let report = modules::sync_once(|key| std::env::var(key).ok()).await;
            report.log_summary("가격 동기화");
            print_report(&report, json);
            report.exit_code()
        }
        Commands::Daemon => run_daemon().await,
    };

    tracing::info!(exit_code = code, "PriceSync 종료");
    ExitCode::from(code)
}

/// 설정을 한 번 검증한 뒤 주기적으로 동기화합니다.
///
/// 실행 중 목록 조회가 실패해도 데몬은 다음 주기까지 계속 동작합니다.
async fn run_daemon() -> u8 {
    let started = CollectorConfig::from_env().and_then(|config| {
        let interval = config.daemon.interval();
        HttpPriceSync::from_config(config).map(|syncer| (syncer, interval))
    });

    let (syncer, period) = match started {
        Ok(pair) => pair,
        Err(e) => {
            let report = RunReport::from_error(&e);
            report.log_summary("가격 동기화");
            print_report(&report, false);
            return report.exit_code();
        }
    };

    tracing::info!(
        "=== 데몬 모드 시작 (주기: {}분) ===",
        period.as_secs() / 60
    );

    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("종료 신호 수신, 데몬 종료 중...");
                break;
            }
            _ = interval.tick() => {
                let report = syncer.run().await;
                report.log_summary("가격 동기화");
                tracing::info!(
                    "=== 동기화 완료, 다음 실행: {}분 후 ===",
                    period.as_secs() / 60
                );
            }
        }
    }

    0
}

fn print_report(report: &RunReport, json: bool) {
    if json {
        match report.to_json_pretty() {
            Ok(text) => println!("{}", text),
            Err(e) => tracing::error!(error = %e, "보고서 직렬화 실패"),
        }
    } else {
        print!("{}", report.render());
    }
}
