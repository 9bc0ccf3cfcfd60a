//! 알림 채널 포트.
//!
//! 구현: `hostwatch-alert` crate (log, email, chat webhook)

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::alert::AlertEvent;

/// 알림 전달 채널
///
/// 각 구현체가 자체 실패/재시도 정책을 소유한다.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// 채널 이름 (로그/보고용)
    fn name(&self) -> &str;

    /// 실패 시 소진되는 최대 시도 횟수 (재시도 없는 채널은 1)
    fn max_attempts(&self) -> u32 {
        1
    }

    /// 알림 1건 전달. 성공 시 시도 횟수를 반환한다.
    async fn send(&self, event: &AlertEvent) -> Result<u32, CoreError>;
}
