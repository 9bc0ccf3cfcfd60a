//! 스냅샷 수집 핸들러.
//!
//! 처리 순서: 토큰 확인 → 스키마 검증 → 이력 추가 → 장기 저장소 쓰기 (best-effort).
//! 인증/검증 실패 시 상태를 변경하지 않는다.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::Json;
use hostwatch_core::error::CoreError;
use hostwatch_core::models::snapshot::MetricSnapshot;
use hostwatch_core::validation::parse_snapshot;
use tracing::{debug, warn};

use super::root::MessageResponse;
use crate::error::ApiError;
use crate::AppState;

/// POST /ingest
pub async fn ingest(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<MessageResponse>, ApiError> {
    authorize(&headers, &state.ingest_token)?;

    let snapshot = parse_snapshot(&body).map_err(|fields| {
        let names: Vec<&str> = fields.iter().map(|f| f.field.as_str()).collect();
        warn!(fields = ?names, "스냅샷 검증 실패");
        CoreError::Validation { fields }
    })?;

    state.history.append(snapshot.clone());
    debug!(host = %snapshot.hostname, timestamp = snapshot.timestamp, "스냅샷 수집");

    write_long_term(&state, &snapshot).await;

    Ok(Json(MessageResponse {
        message: "Metrics received",
    }))
}

/// `Authorization: Bearer <token>` 확인 (토큰은 정확히 일치해야 함)
fn authorize(headers: &HeaderMap, expected: &str) -> Result<(), CoreError> {
    let provided = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match provided {
        Some(token) if !expected.is_empty() && token == expected => Ok(()),
        Some(_) => {
            warn!("수집 토큰 불일치");
            Err(CoreError::Auth("Invalid token".to_string()))
        }
        None => {
            warn!("Authorization 헤더 없음");
            Err(CoreError::Auth("Missing bearer token".to_string()))
        }
    }
}

/// 장기 저장소 쓰기 (실패/타임아웃은 로그만 남김)
async fn write_long_term(state: &AppState, snapshot: &MetricSnapshot) {
    let Some(sink) = &state.sink else {
        return;
    };

    match tokio::time::timeout(state.storage_timeout, sink.write(snapshot)).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!("장기 저장소 쓰기 실패: {e}"),
        Err(_) => warn!("장기 저장소 쓰기 타임아웃 ({:?})", state.storage_timeout),
    }
}
