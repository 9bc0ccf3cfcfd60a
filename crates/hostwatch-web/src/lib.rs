//! # hostwatch-web
//!
//! 원격 에이전트가 스냅샷을 보내는 수집 서버.
//! Axum 기반 REST API.
//!
//! ## 엔드포인트
//! - `POST /ingest`: Bearer 토큰 인증 + 스키마 검증 후 이력 추가, 장기 저장소 쓰기
//! - `GET /history`: 최근 스냅샷 목록 (오래된 순)
//! - `GET /`: liveness

pub mod error;
pub mod handlers;
pub mod routes;

use axum::Router;
use hostwatch_core::config::IngestConfig;
use hostwatch_core::ports::storage::MetricsSink;
use hostwatch_storage::HistoryStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// 수집 서버 애플리케이션 상태
#[derive(Clone)]
pub struct AppState {
    /// 수집 이력 버퍼
    pub history: Arc<HistoryStore>,
    /// 장기 저장소 (비활성화 시 None)
    pub sink: Option<Arc<dyn MetricsSink>>,
    /// 수집 API 공유 토큰
    pub ingest_token: Arc<str>,
    /// 장기 저장소 쓰기 제한 시간
    pub storage_timeout: Duration,
}

impl AppState {
    /// 새 상태 생성
    pub fn new(history: Arc<HistoryStore>, ingest_token: impl Into<Arc<str>>) -> Self {
        Self {
            history,
            sink: None,
            ingest_token: ingest_token.into(),
            storage_timeout: Duration::from_secs(5),
        }
    }

    /// 장기 저장소 설정
    pub fn with_sink(mut self, sink: Arc<dyn MetricsSink>, timeout: Duration) -> Self {
        self.sink = Some(sink);
        self.storage_timeout = timeout;
        self
    }
}

/// 라우터 구성 (CORS + 요청 트레이싱)
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    routes::api_routes()
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// 수집 서버
pub struct IngestServer {
    config: IngestConfig,
    state: AppState,
}

impl IngestServer {
    /// 새 수집 서버 생성
    pub fn new(config: IngestConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// 설정된 호스트/포트에 바인드 (호스트 이름은 DNS로 해석)
    pub async fn bind(&self) -> Result<TcpListener, std::io::Error> {
        let host = self.config.host.as_str();
        let port = self.config.port;
        TcpListener::bind((host, port)).await.map_err(|e| {
            std::io::Error::new(e.kind(), format!("바인드 실패 {host}:{port}: {e}"))
        })
    }

    /// 서버 실행 (종료 신호까지)
    pub async fn run(self, shutdown_rx: watch::Receiver<bool>) -> Result<(), std::io::Error> {
        let listener = self.bind().await?;
        self.serve(listener, shutdown_rx).await
    }

    /// 이미 바인드된 리스너로 서버 실행
    pub async fn serve(
        self,
        listener: TcpListener,
        mut shutdown_rx: watch::Receiver<bool>,
    ) -> Result<(), std::io::Error> {
        info!("수집 서버 시작: http://{}", listener.local_addr()?);

        axum::serve(listener, router(self.state))
            .with_graceful_shutdown(async move {
                loop {
                    if *shutdown_rx.borrow() {
                        info!("수집 서버 종료 신호 수신");
                        break;
                    }
                    if shutdown_rx.changed().await.is_err() {
                        break;
                    }
                }
            })
            .await?;

        info!("수집 서버 종료");
        Ok(())
    }
}
