//! 채팅 웹훅 채널 (Slack incoming webhook 호환).
//!
//! 네트워크 에러나 2xx 외 응답은 [`RetryPolicy`]에 따라 고정 간격으로 재시도한다.

use std::time::Duration;

use async_trait::async_trait;
use hostwatch_core::error::CoreError;
use hostwatch_core::models::alert::AlertEvent;
use hostwatch_core::ports::notifier::NotificationChannel;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::retry::RetryPolicy;

const CHANNEL_NAME: &str = "slack";

/// 채팅 웹훅 채널
pub struct ChatWebhookChannel {
    client: reqwest::Client,
    url: String,
    policy: RetryPolicy,
}

impl ChatWebhookChannel {
    /// 새 웹훅 채널 생성
    pub fn new(url: &str, timeout: Duration, policy: RetryPolicy) -> Result<Self, CoreError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CoreError::Config(format!("HTTP 클라이언트 빌드 실패: {e}")))?;

        Ok(Self {
            client,
            url: url.to_string(),
            policy,
        })
    }

    /// 웹훅 JSON 본문 (`text` + `blocks`)
    pub fn payload(event: &AlertEvent) -> Value {
        let field = |label: &str, value: String| {
            json!({ "type": "mrkdwn", "text": format!("*{label}:*\n{value}") })
        };

        json!({
            "text": event.summary(),
            "blocks": [
                {
                    "type": "section",
                    "text": {
                        "type": "mrkdwn",
                        "text": format!("*ALERT* on `{}`", event.hostname),
                    }
                },
                {
                    "type": "section",
                    "fields": [
                        field("Metric", event.metric.clone()),
                        field("Value", format!("{:.1}%", event.value)),
                        field("Threshold", format!("{:.1}%", event.threshold)),
                        field("Time", event.fired_at.to_rfc3339()),
                    ]
                }
            ]
        })
    }

    async fn post_once(&self, payload: &Value, attempt: u32) -> Result<(), CoreError> {
        let resp = self
            .client
            .post(&self.url)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                warn!(attempt, error = %e, "웹훅 전송 실패");
                CoreError::Transport(e.to_string())
            })?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }

        let text = resp.text().await.unwrap_or_default();
        warn!(attempt, status = %status, "웹훅 응답 실패");
        Err(CoreError::Transport(format!("HTTP {status}: {text}")))
    }
}

#[async_trait]
impl NotificationChannel for ChatWebhookChannel {
    fn name(&self) -> &str {
        CHANNEL_NAME
    }

    fn max_attempts(&self) -> u32 {
        self.policy.attempts()
    }

    async fn send(&self, event: &AlertEvent) -> Result<u32, CoreError> {
        let payload = Self::payload(event);

        match self
            .policy
            .run(|attempt| self.post_once(&payload, attempt))
            .await
        {
            Ok(((), attempts)) => {
                debug!(attempts, metric = %event.metric, "웹훅 알림 전달 완료");
                Ok(attempts)
            }
            Err((e, attempts)) => Err(CoreError::channel(
                CHANNEL_NAME,
                format!("{attempts}회 시도 후 실패: {e}"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use mockito::Matcher;

    fn event() -> AlertEvent {
        AlertEvent {
            metric: "disk".to_string(),
            value: 96.5,
            threshold: 95.0,
            hostname: "db-01".to_string(),
            fired_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    fn channel(url: String) -> ChatWebhookChannel {
        ChatWebhookChannel::new(
            &url,
            Duration::from_secs(5),
            RetryPolicy::new(3, Duration::from_millis(10)),
        )
        .unwrap()
    }

    #[test]
    fn payload_has_text_and_fields() {
        let payload = ChatWebhookChannel::payload(&event());
        assert_eq!(
            payload["text"],
            "ALERT: disk usage 96.5% exceeds threshold 95.0%"
        );
        assert_eq!(payload["blocks"][0]["text"]["text"], "*ALERT* on `db-01`");
        let fields = payload["blocks"][1]["fields"].as_array().unwrap();
        assert_eq!(fields.len(), 4);
        assert_eq!(fields[0]["text"], "*Metric:*\ndisk");
        assert_eq!(fields[2]["text"], "*Threshold:*\n95.0%");
    }

    #[tokio::test]
    async fn delivers_on_first_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/hook")
            .match_header("content-type", "application/json")
            .match_body(Matcher::PartialJson(json!({
                "text": "ALERT: disk usage 96.5% exceeds threshold 95.0%"
            })))
            .with_status(200)
            .with_body("ok")
            .expect(1)
            .create_async()
            .await;

        let attempts = channel(format!("{}/hook", server.url()))
            .send(&event())
            .await
            .unwrap();

        assert_eq!(attempts, 1);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn retries_non_2xx_then_gives_up() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/hook")
            .with_status(500)
            .with_body("boom")
            .expect(3)
            .create_async()
            .await;

        let err = channel(format!("{}/hook", server.url()))
            .send(&event())
            .await
            .unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("slack"));
        assert!(msg.contains("3회"));
        assert!(msg.contains("500"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn unreachable_endpoint_fails_after_all_attempts() {
        // 포트 9 (discard)는 일반적으로 닫혀 있다
        let err = channel("http://127.0.0.1:9/hook".to_string())
            .send(&event())
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Channel { .. }));
    }
}
