//! # hostwatch-core
//!
//! hostwatch 도메인 모델, 포트(trait) 정의, 에러 타입.
//! 모든 크레이트가 공유하는 핵심 타입과 인터페이스를 제공한다.
//!
//! ## 구조
//!
//! - [`models`]: 도메인 데이터 구조체 (serde Serialize/Deserialize)
//! - [`ports`]: Hexagonal Architecture 포트 인터페이스 (async_trait)
//! - [`error`]: 핵심 에러 타입 (thiserror)
//! - [`config`]: 애플리케이션 설정 구조체 + 시크릿
//! - [`config_loader`]: 설정 파일/환경변수 로드
//! - [`validation`]: 수집 페이로드 스키마 검증

pub mod config;
pub mod config_loader;
pub mod error;
pub mod models;
pub mod ports;
pub mod validation;

#[cfg(test)]
mod tests {
    use crate::models::alert::AlertEvent;

    #[test]
    fn alert_event_serde_roundtrip() {
        let event = AlertEvent {
            metric: "cpu".to_string(),
            value: 92.5,
            threshold: 90.0,
            hostname: "web-01".to_string(),
            fired_at: chrono::Utc::now(),
        };

        let json = serde_json::to_string(&event).unwrap();
        let deserialized: AlertEvent = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.metric, "cpu");
        assert_eq!(deserialized.hostname, "web-01");
        assert!(deserialized.value > deserialized.threshold);
    }

    #[test]
    fn config_defaults() {
        let config = crate::config::AppConfig::default_config();
        assert_eq!(config.interval, 10);
        assert_eq!(config.alerts.cooldown, 300);
        assert_eq!(config.alerts.thresholds.get("cpu"), Some(&90.0));
        assert_eq!(config.ingest.history_capacity, 1000);
        assert!(!config.alerts.email.enabled);
        assert!(!config.alerts.slack.enabled);
    }
}
