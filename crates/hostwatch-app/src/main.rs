//! # hostwatch-app
//!
//! hostwatch 바이너리 진입점.
//! 설정 로드, 어댑터 와이어링, 라이프사이클 관리.
//!
//! - `hostwatch agent`: 수집 루프 (샘플링 → 클라우드 전달 → 임계값 알림)
//! - `hostwatch serve`: 수집 서버 (`/ingest`, `/history`)
//! - `hostwatch test-alert`: 설정된 채널로 테스트 알림 1건 발송

mod collector;
mod lifecycle;
mod logging;

use anyhow::{anyhow, bail, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use hostwatch_alert::channels::build_channels;
use hostwatch_alert::Dispatcher;
use hostwatch_core::config::{AppConfig, Secrets};
use hostwatch_core::config_loader;
use hostwatch_core::error::CoreError;
use hostwatch_core::models::alert::AlertEvent;
use hostwatch_core::models::snapshot::METRIC_CPU;
use hostwatch_monitor::system::{resolve_hostname, SysInfoMonitor};
use hostwatch_network::{HttpCloudForwarder, InfluxWriter};
use hostwatch_storage::HistoryStore;
use hostwatch_web::{AppState, IngestServer};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::collector::CollectionLoop;
use crate::lifecycle::LifecycleManager;
use crate::logging::LogFormat;

/// hostwatch 호스트 모니터링 에이전트
#[derive(Parser, Debug)]
#[command(name = "hostwatch")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 실행할 명령 (기본: agent)
    #[command(subcommand)]
    command: Option<Command>,

    /// 설정 파일 경로 (기본: ./config/config.yaml → 플랫폼 설정 디렉토리)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', global = true, default_value = "info")]
    log_level: String,

    /// 로그 형식
    #[arg(long, global = true, value_enum, default_value = "pretty")]
    log_format: LogFormat,

    /// 로그 파일 경로 (기본: stdout)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// 수집 루프 실행
    Agent,
    /// 수집 서버 실행
    Serve,
    /// 테스트 알림 발송
    TestAlert {
        /// 메트릭 이름
        #[arg(long, default_value = METRIC_CPU)]
        metric: String,
        /// 측정값 (기본: 임계값)
        #[arg(long)]
        value: Option<f64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env는 선택 사항
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let _log_guard = logging::init(&args.log_level, args.log_format, args.log_file.as_deref())?;

    let config = config_loader::load(args.config.as_deref())?;
    let secrets = Secrets::from_env();
    info!("hostwatch v{} 시작", env!("CARGO_PKG_VERSION"));

    match args.command.unwrap_or(Command::Agent) {
        Command::Agent => run_agent(config, secrets).await,
        Command::Serve => run_server(config, secrets).await,
        Command::TestAlert { metric, value } => send_test_alert(&config, &secrets, metric, value).await,
    }
}

/// 수집 루프 실행
async fn run_agent(config: AppConfig, secrets: Secrets) -> Result<()> {
    let monitor = Arc::new(SysInfoMonitor::new(config.hostname.clone()));
    info!("호스트: {}", monitor.hostname());

    let channels = build_channels(&config.alerts, &secrets)?;
    let dispatcher = Arc::new(Dispatcher::new(channels));

    let mut collection = CollectionLoop::new(
        monitor,
        dispatcher,
        config.alerts.threshold_config(),
        config.collection_interval(),
    );

    if config.cloud.enabled {
        if secrets.auth_token.is_none() {
            warn!("AUTH_TOKEN 미설정, 인증 없이 클라우드 전달");
        }
        let forwarder = HttpCloudForwarder::new(
            &config.cloud.endpoint,
            secrets.auth_token.clone(),
            Duration::from_secs(config.cloud.timeout_secs),
        )?;
        collection = collection.with_forwarder(Arc::new(forwarder));
        info!("클라우드 전달: {}", config.cloud.endpoint);
    }

    let lifecycle = LifecycleManager::new();
    let handle = tokio::spawn(collection.run(lifecycle.subscribe()));

    info!("hostwatch 에이전트 실행 중 (Ctrl+C로 종료)");
    lifecycle.wait_for_signal().await;

    if let Err(e) = handle.await {
        error!("수집 루프 태스크 에러: {e}");
    }
    info!("hostwatch 에이전트 종료");
    Ok(())
}

/// 수집 서버 실행
async fn run_server(config: AppConfig, secrets: Secrets) -> Result<()> {
    let token = secrets
        .ingest_token
        .clone()
        .ok_or_else(|| CoreError::Config("serve 실행 시 INGEST_TOKEN이 필요합니다".into()))?;

    let history = Arc::new(HistoryStore::new(config.ingest.history_capacity));
    let mut state = AppState::new(history, token);

    if config.storage.enabled {
        let writer = InfluxWriter::new(&config.storage, secrets.influxdb_token.clone())?;
        state = state.with_sink(
            Arc::new(writer),
            Duration::from_secs(config.storage.timeout_secs),
        );
        info!("장기 저장소: {} (bucket={})", config.storage.url, config.storage.bucket);
    }

    let lifecycle = LifecycleManager::new();
    let server = IngestServer::new(config.ingest.clone(), state);
    let handle = tokio::spawn(server.run(lifecycle.subscribe()));

    lifecycle.wait_for_signal().await;

    match handle.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!("수집 서버 오류: {e}"),
        Err(e) => error!("수집 서버 태스크 에러: {e}"),
    }
    Ok(())
}

/// 설정된 모든 채널로 테스트 알림 발송
async fn send_test_alert(
    config: &AppConfig,
    secrets: &Secrets,
    metric: String,
    value: Option<f64>,
) -> Result<()> {
    let threshold = config
        .alerts
        .thresholds
        .get(&metric)
        .copied()
        .ok_or_else(|| anyhow!("임계값이 설정되지 않은 메트릭: {metric}"))?;

    let event = AlertEvent {
        metric,
        value: value.unwrap_or(threshold),
        threshold,
        hostname: resolve_hostname(config.hostname.clone()),
        fired_at: Utc::now(),
    };

    let dispatcher = Dispatcher::new(build_channels(&config.alerts, secrets)?);
    let reports = dispatcher.dispatch(&event).await;

    let mut failed = 0;
    for report in &reports {
        if report.is_delivered() {
            info!(channel = %report.channel, attempts = report.attempts, "테스트 알림 전달");
        } else {
            failed += 1;
        }
    }

    if failed > 0 {
        bail!("{failed}/{}개 채널 전달 실패", reports.len());
    }
    Ok(())
}
