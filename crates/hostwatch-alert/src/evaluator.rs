//! 임계값 평가기.
//!
//! 평탄화된 메트릭을 임계값과 비교하고, 메트릭별 쿨다운을 적용해
//! 알림 이벤트를 만든다. 쿨다운 상태는 수집 루프가 소유하고 `&mut`로 전달한다.

use chrono::{DateTime, Utc};
use hostwatch_core::config::ThresholdConfig;
use hostwatch_core::models::alert::AlertEvent;
use hostwatch_core::models::snapshot::FlatMetrics;
use std::collections::HashMap;
use tracing::debug;

/// 메트릭별 마지막 알림 시각 (프로세스 재시작 시 초기화)
#[derive(Debug, Default, Clone)]
pub struct CooldownState {
    last_fired: HashMap<String, DateTime<Utc>>,
}

impl CooldownState {
    /// 빈 상태 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 메트릭의 마지막 알림 시각
    pub fn last_fired(&self, metric: &str) -> Option<DateTime<Utc>> {
        self.last_fired.get(metric).copied()
    }

    /// 기록된 메트릭 수
    pub fn len(&self) -> usize {
        self.last_fired.len()
    }

    /// 비어있는지
    pub fn is_empty(&self) -> bool {
        self.last_fired.is_empty()
    }

    /// 전체 초기화
    pub fn clear(&mut self) {
        self.last_fired.clear();
    }

    /// 쿨다운 중인지 (시계가 역행한 경우도 쿨다운으로 본다)
    fn in_cooldown(&self, metric: &str, now: DateTime<Utc>, config: &ThresholdConfig) -> bool {
        self.last_fired.get(metric).is_some_and(|last| {
            now.signed_duration_since(*last)
                .to_std()
                .map_or(true, |elapsed| elapsed < config.cooldown)
        })
    }

    fn record(&mut self, metric: &str, now: DateTime<Utc>) {
        self.last_fired.insert(metric.to_string(), now);
    }
}

/// 임계값 평가
///
/// 값이 임계값 이상이고 쿨다운 밖이면 이벤트를 만들고 `state`를 갱신한다.
/// 임계값이 없는 메트릭은 무시한다. 출력은 메트릭 이름 순서.
pub fn evaluate(
    flat: &FlatMetrics,
    config: &ThresholdConfig,
    state: &mut CooldownState,
    hostname: &str,
    now: DateTime<Utc>,
) -> Vec<AlertEvent> {
    let mut events = Vec::new();

    for (metric, &value) in flat {
        let Some(&threshold) = config.thresholds.get(metric) else {
            continue;
        };
        if value.is_nan() || value < threshold {
            continue;
        }
        if state.in_cooldown(metric, now, config) {
            debug!(metric = %metric, value, threshold, "쿨다운 중, 알림 억제");
            continue;
        }

        state.record(metric, now);
        events.push(AlertEvent {
            metric: metric.clone(),
            value,
            threshold,
            hostname: hostname.to_string(),
            fired_at: now,
        });
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, TimeZone};
    use std::collections::BTreeMap;
    use std::time::Duration;

    fn config() -> ThresholdConfig {
        ThresholdConfig {
            thresholds: BTreeMap::from([
                ("cpu".to_string(), 90.0),
                ("memory".to_string(), 85.0),
                ("disk".to_string(), 95.0),
            ]),
            cooldown: Duration::from_secs(300),
        }
    }

    fn flat(pairs: &[(&str, f64)]) -> FlatMetrics {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn breach_at_or_above_threshold_fires() {
        let mut state = CooldownState::new();
        let events = evaluate(
            &flat(&[("cpu", 92.0), ("memory", 80.0), ("disk", 95.0)]),
            &config(),
            &mut state,
            "web-01",
            t0(),
        );

        let fired: Vec<_> = events.iter().map(|e| e.metric.as_str()).collect();
        assert_eq!(fired, vec!["cpu", "disk"]);
        assert_eq!(events[0].value, 92.0);
        assert_eq!(events[0].threshold, 90.0);
        assert_eq!(events[1].hostname, "web-01");
        assert_eq!(state.last_fired("cpu"), Some(t0()));
        assert_eq!(state.last_fired("memory"), None);
        assert_eq!(state.len(), 2);
    }

    #[test]
    fn repeat_breach_within_cooldown_is_suppressed() {
        let mut state = CooldownState::new();
        let breach = flat(&[("cpu", 95.0)]);

        assert_eq!(evaluate(&breach, &config(), &mut state, "h", t0()).len(), 1);

        let later = t0() + ChronoDuration::seconds(299);
        assert!(evaluate(&breach, &config(), &mut state, "h", later).is_empty());
        // 억제된 평가는 기준 시각을 옮기지 않는다
        assert_eq!(state.last_fired("cpu"), Some(t0()));
    }

    #[test]
    fn fires_again_once_cooldown_elapses() {
        let mut state = CooldownState::new();
        let breach = flat(&[("cpu", 95.0)]);
        evaluate(&breach, &config(), &mut state, "h", t0());

        let at_boundary = t0() + ChronoDuration::seconds(300);
        let events = evaluate(&breach, &config(), &mut state, "h", at_boundary);
        assert_eq!(events.len(), 1);
        assert_eq!(state.last_fired("cpu"), Some(at_boundary));
    }

    #[test]
    fn metrics_without_threshold_are_ignored() {
        let mut state = CooldownState::new();
        let events = evaluate(
            &flat(&[("swap", 100.0), ("gpu", 99.0)]),
            &config(),
            &mut state,
            "h",
            t0(),
        );
        assert!(events.is_empty());
        assert!(state.is_empty());
    }

    #[test]
    fn metrics_are_cooled_down_independently() {
        let mut state = CooldownState::new();
        evaluate(&flat(&[("cpu", 95.0)]), &config(), &mut state, "h", t0());

        let later = t0() + ChronoDuration::seconds(10);
        let events = evaluate(
            &flat(&[("cpu", 95.0), ("memory", 90.0)]),
            &config(),
            &mut state,
            "h",
            later,
        );
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].metric, "memory");
    }

    #[test]
    fn clock_going_backwards_keeps_suppression() {
        let mut state = CooldownState::new();
        let breach = flat(&[("disk", 99.0)]);
        evaluate(&breach, &config(), &mut state, "h", t0());

        let earlier = t0() - ChronoDuration::seconds(60);
        assert!(evaluate(&breach, &config(), &mut state, "h", earlier).is_empty());
    }

    #[test]
    fn nan_values_never_fire() {
        let mut state = CooldownState::new();
        let events = evaluate(&flat(&[("cpu", f64::NAN)]), &config(), &mut state, "h", t0());
        assert!(events.is_empty());
    }

    #[test]
    fn clear_resets_cooldowns() {
        let mut state = CooldownState::new();
        let breach = flat(&[("cpu", 95.0)]);
        evaluate(&breach, &config(), &mut state, "h", t0());
        state.clear();

        let soon = t0() + ChronoDuration::seconds(1);
        assert_eq!(evaluate(&breach, &config(), &mut state, "h", soon).len(), 1);
    }
}
