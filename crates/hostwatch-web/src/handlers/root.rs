//! 루트 (liveness) 핸들러.

use axum::Json;
use serde::Serialize;

/// 단순 메시지 응답
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// 메시지
    pub message: &'static str,
}

/// GET /
pub async fn welcome() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Welcome to the hostwatch metrics API",
    })
}
