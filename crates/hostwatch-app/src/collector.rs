//! 수집 루프.
//!
//! 주기마다 샘플링 → 클라우드 전달 → 평탄화 → 임계값 평가 → 알림 디스패치를 수행한다.
//! 디스패치는 별도 태스크로 띄워 느린 채널이 다음 틱을 지연시키지 않는다.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use hostwatch_alert::{evaluate, CooldownState, Dispatcher};
use hostwatch_core::config::ThresholdConfig;
use hostwatch_core::models::alert::{AlertEvent, DeliveryReport};
use hostwatch_core::models::snapshot::MetricSnapshot;
use hostwatch_core::ports::forwarder::SnapshotForwarder;
use hostwatch_core::ports::monitor::SystemMonitor;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// 한 틱의 결과
#[derive(Debug)]
pub struct TickReport {
    /// 수집된 스냅샷 (샘플링 실패 시 None)
    pub snapshot: Option<MetricSnapshot>,
    /// 클라우드 전달 성공 여부 (전달기가 없거나 샘플링 실패 시 None)
    pub forwarded: Option<bool>,
    /// 발생한 알림
    pub alerts: Vec<AlertEvent>,
    /// 알림별 디스패치 태스크
    pub dispatches: Vec<JoinHandle<Vec<DeliveryReport>>>,
}

/// 수집 루프
pub struct CollectionLoop {
    monitor: Arc<dyn SystemMonitor>,
    forwarder: Option<Arc<dyn SnapshotForwarder>>,
    dispatcher: Arc<Dispatcher>,
    thresholds: ThresholdConfig,
    cooldowns: CooldownState,
    interval: Duration,
}

impl CollectionLoop {
    /// 새 수집 루프 생성
    pub fn new(
        monitor: Arc<dyn SystemMonitor>,
        dispatcher: Arc<Dispatcher>,
        thresholds: ThresholdConfig,
        interval: Duration,
    ) -> Self {
        Self {
            monitor,
            forwarder: None,
            dispatcher,
            thresholds,
            cooldowns: CooldownState::new(),
            interval,
        }
    }

    /// 클라우드 전달기 설정
    pub fn with_forwarder(mut self, forwarder: Arc<dyn SnapshotForwarder>) -> Self {
        self.forwarder = Some(forwarder);
        self
    }

    /// 현재 쿨다운 상태
    #[cfg(test)]
    pub fn cooldowns(&self) -> &CooldownState {
        &self.cooldowns
    }

    /// 1회 수집 주기
    pub async fn tick(&mut self, now: DateTime<Utc>) -> TickReport {
        let snapshot = match self.monitor.collect_snapshot().await {
            Ok(s) => s,
            Err(e) => {
                warn!("메트릭 수집 실패: {e}");
                return TickReport {
                    snapshot: None,
                    forwarded: None,
                    alerts: Vec::new(),
                    dispatches: Vec::new(),
                };
            }
        };

        let forwarded = match &self.forwarder {
            Some(forwarder) => match forwarder.forward(&snapshot).await {
                Ok(()) => Some(true),
                Err(e) => {
                    warn!("클라우드 전달 실패: {e}");
                    Some(false)
                }
            },
            None => None,
        };

        let flat = snapshot.flatten();
        let alerts = evaluate(
            &flat,
            &self.thresholds,
            &mut self.cooldowns,
            &snapshot.hostname,
            now,
        );

        let dispatches = alerts
            .iter()
            .cloned()
            .map(|event| {
                let dispatcher = self.dispatcher.clone();
                tokio::spawn(async move { dispatcher.dispatch(&event).await })
            })
            .collect();

        debug!(
            cpu = snapshot.cpu.average,
            memory = snapshot.memory.percent,
            disk = snapshot.disk.percent,
            alerts = alerts.len(),
            "수집 주기 완료"
        );

        TickReport {
            snapshot: Some(snapshot),
            forwarded,
            alerts,
            dispatches,
        }
    }

    /// 종료 신호까지 주기 실행
    pub async fn run(mut self, mut shutdown_rx: watch::Receiver<bool>) {
        info!("수집 루프 시작: 주기 {}초", self.interval.as_secs());

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    // 디스패치 태스크는 분리 실행
                    let _ = self.tick(Utc::now()).await;
                }
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        info!("수집 루프 종료");
                        break;
                    }
                }
            }
        }
    }
}
