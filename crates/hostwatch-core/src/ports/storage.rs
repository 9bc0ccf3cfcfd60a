//! 장기 저장소 포트.
//!
//! 구현: `hostwatch-network` crate (InfluxDB line protocol)

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::snapshot::MetricSnapshot;

/// 장기 시계열 저장소 쓰기
///
/// 실패는 호출자에게 치명적이지 않다 (호출자가 로그 후 무시).
#[async_trait]
pub trait MetricsSink: Send + Sync {
    /// 스냅샷 1건 기록
    async fn write(&self, snapshot: &MetricSnapshot) -> Result<(), CoreError>;
}
