//! 시스템 모니터링 포트.
//!
//! 구현: `hostwatch-monitor` crate (sysinfo)

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::snapshot::MetricSnapshot;

/// 시스템 리소스 샘플링 (CPU, 메모리, 디스크)
#[async_trait]
pub trait SystemMonitor: Send + Sync {
    /// 현재 호스트의 메트릭 스냅샷 수집
    async fn collect_snapshot(&self) -> Result<MetricSnapshot, CoreError>;
}
