//! API 라우트 정의.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::AppState;

/// API 라우트 생성
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::root::welcome))
        // 수집
        .route("/ingest", post(handlers::ingest::ingest))
        // 이력 조회 (인증 없음)
        .route("/history", get(handlers::history::get_history))
        .fallback(handlers::not_found)
}
