//! API 핸들러 모듈.

pub mod history;
pub mod ingest;
pub mod root;

use axum::http::Uri;

use crate::error::ApiError;

/// 등록되지 않은 경로
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(uri.path().to_string())
}
