//! 알림 채널 구현.
//!
//! 시작 시 설정에서 한 번 만들어 [`Dispatcher`](crate::Dispatcher)에 넘긴다.
//! 로그 채널은 항상 포함되며, 이메일/웹훅은 설정 플래그로 켠다.

pub mod email;
pub mod log;
pub mod webhook;

use std::sync::Arc;
use std::time::Duration;

use hostwatch_core::config::{AlertsConfig, Secrets};
use hostwatch_core::error::CoreError;
use hostwatch_core::ports::notifier::NotificationChannel;
use tracing::info;

use crate::retry::RetryPolicy;

pub use email::EmailChannel;
pub use log::LogChannel;
pub use webhook::ChatWebhookChannel;

/// 설정에서 활성 채널 목록 생성 (순서: log, email, webhook)
///
/// 활성화된 채널에 필요한 시크릿이 없으면 `CoreError::Config`.
pub fn build_channels(
    config: &AlertsConfig,
    secrets: &Secrets,
) -> Result<Vec<Arc<dyn NotificationChannel>>, CoreError> {
    let mut channels: Vec<Arc<dyn NotificationChannel>> = vec![Arc::new(LogChannel)];

    if config.email.enabled {
        let password = secrets.smtp_password.as_deref().ok_or_else(|| {
            CoreError::Config("이메일 채널 활성화 시 SMTP_PASSWORD가 필요합니다".into())
        })?;
        channels.push(Arc::new(EmailChannel::new(&config.email, password)?));
    }

    if config.slack.enabled {
        let url = secrets.slack_webhook_url.as_deref().ok_or_else(|| {
            CoreError::Config("웹훅 채널 활성화 시 SLACK_WEBHOOK_URL이 필요합니다".into())
        })?;
        let policy = RetryPolicy::new(
            config.slack.max_attempts,
            Duration::from_secs(config.slack.retry_delay_secs),
        );
        channels.push(Arc::new(ChatWebhookChannel::new(
            url,
            Duration::from_secs(config.slack.timeout_secs),
            policy,
        )?));
    }

    let names: Vec<&str> = channels.iter().map(|c| c.name()).collect();
    info!("알림 채널 구성: {}", names.join(", "));
    Ok(channels)
}
