//! 알림 파이프라인 통합 테스트.
//!
//! 스냅샷 → 평탄화 → 임계값 평가 → 디스패처 → 채널 (log + webhook).

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use hostwatch_alert::channels::{ChatWebhookChannel, LogChannel};
use hostwatch_alert::{evaluate, CooldownState, Dispatcher, RetryPolicy};
use hostwatch_core::config::AppConfig;
use hostwatch_core::error::CoreError;
use hostwatch_core::models::alert::AlertEvent;
use hostwatch_core::models::snapshot::{CpuUsage, MetricSnapshot, UsageStats};
use hostwatch_core::ports::notifier::NotificationChannel;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

struct RecordingChannel {
    events: AtomicU32,
}

#[async_trait]
impl NotificationChannel for RecordingChannel {
    fn name(&self) -> &str {
        "recording"
    }

    async fn send(&self, _event: &AlertEvent) -> Result<u32, CoreError> {
        self.events.fetch_add(1, Ordering::SeqCst);
        Ok(1)
    }
}

fn snapshot(cpu: f64, memory: f64, disk: f64) -> MetricSnapshot {
    let usage = |percent: f64| UsageStats {
        total: 1_000,
        used: (percent * 10.0) as u64,
        free: 1_000 - (percent * 10.0) as u64,
        percent,
    };
    MetricSnapshot {
        timestamp: 1_714_564_800,
        hostname: "web-01".to_string(),
        cpu: CpuUsage::from_per_core(vec![cpu, cpu]),
        memory: usage(memory),
        disk: usage(disk),
    }
}

#[test]
fn default_thresholds_fire_cpu_and_disk_only() {
    let config = AppConfig::default_config();
    let mut state = CooldownState::new();
    let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

    let events = evaluate(
        &snapshot(92.0, 80.0, 95.0).flatten(),
        &config.alerts.threshold_config(),
        &mut state,
        "web-01",
        now,
    );

    let fired: Vec<(&str, f64, f64)> = events
        .iter()
        .map(|e| (e.metric.as_str(), e.value, e.threshold))
        .collect();
    assert_eq!(fired, vec![("cpu", 92.0, 90.0), ("disk", 95.0, 95.0)]);
}

#[tokio::test]
async fn failing_webhook_does_not_stop_log_or_other_channels() {
    let mut server = mockito::Server::new_async().await;
    let webhook_mock = server
        .mock("POST", "/services/hook")
        .with_status(503)
        .expect(3)
        .create_async()
        .await;

    let webhook = ChatWebhookChannel::new(
        &format!("{}/services/hook", server.url()),
        Duration::from_secs(5),
        RetryPolicy::new(3, Duration::from_millis(5)),
    )
    .unwrap();
    let recording = Arc::new(RecordingChannel {
        events: AtomicU32::new(0),
    });
    let channels: Vec<Arc<dyn NotificationChannel>> =
        vec![Arc::new(LogChannel), Arc::new(webhook), recording.clone()];
    let dispatcher = Dispatcher::new(channels);

    let config = AppConfig::default_config();
    let mut state = CooldownState::new();
    let events = evaluate(
        &snapshot(99.0, 10.0, 10.0).flatten(),
        &config.alerts.threshold_config(),
        &mut state,
        "web-01",
        Utc::now(),
    );
    assert_eq!(events.len(), 1);

    let reports = dispatcher.dispatch(&events[0]).await;

    assert_eq!(reports.len(), 3);
    assert_eq!(reports[0].channel, "log");
    assert!(reports[0].is_delivered());
    assert_eq!(reports[1].channel, "slack");
    assert!(!reports[1].is_delivered());
    assert_eq!(reports[1].attempts, 3);
    assert!(reports[2].is_delivered());
    assert_eq!(recording.events.load(Ordering::SeqCst), 1);
    webhook_mock.assert_async().await;
}
