//! 수집 이력 조회 핸들러.

use axum::extract::State;
use axum::Json;
use hostwatch_core::models::snapshot::MetricSnapshot;

use crate::AppState;

/// 최근 스냅샷 조회 (오래된 순)
///
/// GET /history
pub async fn get_history(State(state): State<AppState>) -> Json<Vec<MetricSnapshot>> {
    Json(state.history.recent())
}
