//! 이메일 채널.
//!
//! STARTTLS SMTP 릴레이로 알림 1건을 보낸다. 재시도하지 않는다 (최대 1회 전달).

use std::time::Duration;

use async_trait::async_trait;
use hostwatch_core::config::EmailConfig;
use hostwatch_core::error::CoreError;
use hostwatch_core::models::alert::AlertEvent;
use hostwatch_core::ports::notifier::NotificationChannel;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

const CHANNEL_NAME: &str = "email";

/// SMTP 세션 타임아웃
const SMTP_TIMEOUT: Duration = Duration::from_secs(10);

/// SMTP 이메일 채널
pub struct EmailChannel {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: String,
    recipient: String,
}

impl EmailChannel {
    /// 새 이메일 채널 생성 (로그인 계정은 발신 주소)
    pub fn new(config: &EmailConfig, password: &str) -> Result<Self, CoreError> {
        let credentials = Credentials::new(config.sender.clone(), password.to_string());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_server)
            .map_err(|e| CoreError::Config(format!("SMTP 릴레이 설정 실패: {e}")))?
            .port(config.smtp_port)
            .credentials(credentials)
            .timeout(Some(SMTP_TIMEOUT))
            .build();

        Ok(Self {
            transport,
            sender: config.sender.clone(),
            recipient: config.recipient.clone(),
        })
    }

    /// 메일 제목
    pub fn subject(event: &AlertEvent) -> String {
        format!("[ALERT] High {} usage on {}", event.metric, event.hostname)
    }

    /// 메일 본문
    pub fn body(event: &AlertEvent) -> String {
        format!(
            "{}\nHost: {}\nTime: {}",
            event.summary(),
            event.hostname,
            event.fired_at.to_rfc3339()
        )
    }

    fn build_message(&self, event: &AlertEvent) -> Result<Message, CoreError> {
        let from = self
            .sender
            .parse::<Mailbox>()
            .map_err(|e| CoreError::channel(CHANNEL_NAME, format!("발신 주소 오류: {e}")))?;
        let to = self
            .recipient
            .parse::<Mailbox>()
            .map_err(|e| CoreError::channel(CHANNEL_NAME, format!("수신 주소 오류: {e}")))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(Self::subject(event))
            .header(ContentType::TEXT_PLAIN)
            .body(Self::body(event))
            .map_err(|e| CoreError::channel(CHANNEL_NAME, format!("메시지 생성 실패: {e}")))
    }
}

#[async_trait]
impl NotificationChannel for EmailChannel {
    fn name(&self) -> &str {
        CHANNEL_NAME
    }

    async fn send(&self, event: &AlertEvent) -> Result<u32, CoreError> {
        let message = self.build_message(event)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| CoreError::channel(CHANNEL_NAME, e.to_string()))?;
        debug!(recipient = %self.recipient, metric = %event.metric, "알림 메일 발송 완료");
        Ok(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn event() -> AlertEvent {
        AlertEvent {
            metric: "cpu".to_string(),
            value: 92.0,
            threshold: 90.0,
            hostname: "web-01".to_string(),
            fired_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    fn config(sender: &str) -> EmailConfig {
        EmailConfig {
            enabled: true,
            smtp_server: "smtp.example.com".to_string(),
            smtp_port: 587,
            sender: sender.to_string(),
            recipient: "ops@example.com".to_string(),
        }
    }

    #[test]
    fn subject_and_body_format() {
        let event = event();
        assert_eq!(EmailChannel::subject(&event), "[ALERT] High cpu usage on web-01");
        assert_eq!(
            EmailChannel::body(&event),
            "ALERT: cpu usage 92.0% exceeds threshold 90.0%\nHost: web-01\nTime: 2024-05-01T12:00:00+00:00"
        );
    }

    #[tokio::test]
    async fn invalid_sender_address_fails_without_connecting() {
        let channel = EmailChannel::new(&config("not-an-address"), "pw").unwrap();
        let err = channel.send(&event()).await.unwrap_err();
        assert!(matches!(err, CoreError::Channel { ref channel, .. } if channel == "email"));
        assert_eq!(channel.max_attempts(), 1);
    }
}
