//! 로그 채널. 운영 로그에 구조화된 경고 레코드를 남긴다.

use async_trait::async_trait;
use hostwatch_core::error::CoreError;
use hostwatch_core::models::alert::AlertEvent;
use hostwatch_core::ports::notifier::NotificationChannel;
use tracing::warn;

/// 항상 활성화되는 로그 채널
#[derive(Debug, Default, Clone, Copy)]
pub struct LogChannel;

#[async_trait]
impl NotificationChannel for LogChannel {
    fn name(&self) -> &str {
        "log"
    }

    async fn send(&self, event: &AlertEvent) -> Result<u32, CoreError> {
        warn!(
            metric = %event.metric,
            value = event.value,
            threshold = event.threshold,
            host = %event.hostname,
            fired_at = %event.fired_at.to_rfc3339(),
            "Threshold exceeded - {}: {:.1}% (threshold: {:.1}%)",
            event.metric,
            event.value,
            event.threshold
        );
        Ok(1)
    }
}
