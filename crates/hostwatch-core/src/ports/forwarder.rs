//! 클라우드 전달 포트.
//!
//! 구현: `hostwatch-network` crate (HTTP POST + Bearer 토큰)

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::snapshot::MetricSnapshot;

/// 수집한 스냅샷을 원격 수집 엔드포인트로 전달
///
/// 이 호출 지점에서는 재시도하지 않는다.
#[async_trait]
pub trait SnapshotForwarder: Send + Sync {
    /// 스냅샷 전체를 JSON 본문으로 전송
    async fn forward(&self, snapshot: &MetricSnapshot) -> Result<(), CoreError>;
}
