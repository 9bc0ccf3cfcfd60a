//! 알림 디스패처.
//!
//! 이벤트 1건을 모든 활성 채널에 동시에 보낸다. 한 채널의 실패는 다른 채널에
//! 영향을 주지 않으며 호출자에게 전파되지 않는다 (로그 + [`DeliveryReport`]).

use std::sync::Arc;

use futures::future::join_all;
use hostwatch_core::models::alert::{AlertEvent, DeliveryOutcome, DeliveryReport};
use hostwatch_core::ports::notifier::NotificationChannel;
use tracing::error;

/// 알림 디스패처
pub struct Dispatcher {
    channels: Vec<Arc<dyn NotificationChannel>>,
}

impl Dispatcher {
    /// 채널 목록으로 디스패처 생성 (순서 유지)
    pub fn new(channels: Vec<Arc<dyn NotificationChannel>>) -> Self {
        Self { channels }
    }

    /// 채널 이름 목록
    pub fn channel_names(&self) -> Vec<String> {
        self.channels.iter().map(|c| c.name().to_string()).collect()
    }

    /// 이벤트를 모든 채널로 전달
    ///
    /// 보고서는 채널 순서와 같다.
    pub async fn dispatch(&self, event: &AlertEvent) -> Vec<DeliveryReport> {
        let sends = self.channels.iter().map(|channel| async move {
            match channel.send(event).await {
                Ok(attempts) => DeliveryReport {
                    channel: channel.name().to_string(),
                    attempts,
                    outcome: DeliveryOutcome::Delivered,
                },
                Err(e) => {
                    error!(
                        channel = channel.name(),
                        metric = %event.metric,
                        host = %event.hostname,
                        "알림 전달 실패: {e}"
                    );
                    DeliveryReport {
                        channel: channel.name().to_string(),
                        attempts: channel.max_attempts(),
                        outcome: DeliveryOutcome::Failed {
                            error: e.to_string(),
                        },
                    }
                }
            }
        });

        join_all(sends).await
    }
}
