//! 수집 경로 통합 테스트.
//!
//! 에이전트 전달기 → 실제 수집 서버 (TCP) → 이력 버퍼.

use hostwatch_core::config::IngestConfig;
use hostwatch_core::models::snapshot::{CpuUsage, MetricSnapshot, UsageStats};
use hostwatch_core::ports::forwarder::SnapshotForwarder;
use hostwatch_network::HttpCloudForwarder;
use hostwatch_storage::HistoryStore;
use hostwatch_web::{AppState, IngestServer};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;

fn snapshot(timestamp: i64, memory_percent: f64) -> MetricSnapshot {
    MetricSnapshot {
        timestamp,
        hostname: "edge-3".to_string(),
        cpu: CpuUsage::from_per_core(vec![5.0, 15.0]),
        memory: UsageStats {
            total: 8_000,
            used: 4_000,
            free: 4_000,
            percent: memory_percent,
        },
        disk: UsageStats {
            total: 100,
            used: 10,
            free: 90,
            percent: 10.0,
        },
    }
}

async fn start_server(
    history: Arc<HistoryStore>,
    token: &str,
) -> (String, watch::Sender<bool>, tokio::task::JoinHandle<std::io::Result<()>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let server = IngestServer::new(IngestConfig::default(), AppState::new(history, token));
    let handle = tokio::spawn(server.serve(listener, shutdown_rx));
    (format!("http://{addr}/ingest"), shutdown_tx, handle)
}

#[tokio::test]
async fn forwarded_snapshots_land_in_history() {
    let history = Arc::new(HistoryStore::new(2));
    let (endpoint, shutdown_tx, handle) = start_server(history.clone(), "shared").await;

    let forwarder =
        HttpCloudForwarder::new(&endpoint, Some("shared".to_string()), Duration::from_secs(5))
            .unwrap();
    for ts in [10, 20, 30] {
        forwarder.forward(&snapshot(ts, 50.0)).await.unwrap();
    }

    let timestamps: Vec<i64> = history.recent().iter().map(|s| s.timestamp).collect();
    assert_eq!(timestamps, vec![20, 30]);

    shutdown_tx.send(true).unwrap();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn wrong_token_and_bad_payload_leave_history_untouched() {
    let history = Arc::new(HistoryStore::new(10));
    let (endpoint, shutdown_tx, handle) = start_server(history.clone(), "shared").await;

    let intruder =
        HttpCloudForwarder::new(&endpoint, Some("guess".to_string()), Duration::from_secs(5))
            .unwrap();
    let err = intruder.forward(&snapshot(1, 50.0)).await.unwrap_err();
    assert!(err.to_string().contains("401"));

    let agent =
        HttpCloudForwarder::new(&endpoint, Some("shared".to_string()), Duration::from_secs(5))
            .unwrap();
    let err = agent.forward(&snapshot(2, -4.0)).await.unwrap_err();
    assert!(err.to_string().contains("422"));
    assert!(err.to_string().contains("memory.percent"));

    assert!(history.is_empty());

    shutdown_tx.send(true).unwrap();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn concurrent_ingest_keeps_every_snapshot() {
    let history = Arc::new(HistoryStore::new(100));
    let (endpoint, shutdown_tx, handle) = start_server(history.clone(), "shared").await;

    let forwarder = Arc::new(
        HttpCloudForwarder::new(&endpoint, Some("shared".to_string()), Duration::from_secs(5))
            .unwrap(),
    );
    let tasks: Vec<_> = (0..40)
        .map(|ts| {
            let forwarder = forwarder.clone();
            tokio::spawn(async move { forwarder.forward(&snapshot(ts, 30.0)).await })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let mut timestamps: Vec<i64> = history.recent().iter().map(|s| s.timestamp).collect();
    assert_eq!(timestamps.len(), 40);
    timestamps.sort_unstable();
    assert_eq!(timestamps, (0..40).collect::<Vec<_>>());

    shutdown_tx.send(true).unwrap();
    handle.await.unwrap().unwrap();
}
