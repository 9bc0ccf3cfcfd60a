//! 알림 이벤트 및 전달 결과 모델.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 임계값 초과 알림 이벤트
///
/// 평가기가 생성하고 디스패처가 소비한 뒤 버린다 (별도 알림 로그 없음).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    /// 메트릭 이름 ("cpu", "memory", "disk")
    pub metric: String,
    /// 측정값
    pub value: f64,
    /// 설정된 임계값
    pub threshold: f64,
    /// 호스트 이름
    pub hostname: String,
    /// 발생 시각
    pub fired_at: DateTime<Utc>,
}

impl AlertEvent {
    /// 한 줄 요약 메시지
    pub fn summary(&self) -> String {
        format!(
            "ALERT: {} usage {:.1}% exceeds threshold {:.1}%",
            self.metric, self.value, self.threshold
        )
    }
}

/// 채널 단위 전달 결과
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeliveryOutcome {
    /// 전달 성공
    Delivered,
    /// 전달 실패 (로그에 기록되고 삼켜짐)
    Failed {
        /// 실패 사유
        error: String,
    },
}

/// 한 채널에 대한 디스패치 보고
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliveryReport {
    /// 채널 이름
    pub channel: String,
    /// 시도 횟수
    pub attempts: u32,
    /// 결과
    pub outcome: DeliveryOutcome,
}

impl DeliveryReport {
    /// 전달 성공 여부
    pub fn is_delivered(&self) -> bool {
        matches!(self.outcome, DeliveryOutcome::Delivered)
    }
}
