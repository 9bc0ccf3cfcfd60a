//! 시스템 메트릭 스냅샷 모델.
//!
//! 한 호스트의 CPU, 메모리, 디스크 사용량을 한 시점에 기록한 값.
//! JSON 필드 이름은 수집 API 와이어 포맷과 동일하다.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 평탄화된 메트릭 이름: CPU 평균 사용률
pub const METRIC_CPU: &str = "cpu";
/// 평탄화된 메트릭 이름: 메모리 사용률
pub const METRIC_MEMORY: &str = "memory";
/// 평탄화된 메트릭 이름: 디스크 사용률
pub const METRIC_DISK: &str = "disk";

/// 메트릭 이름 → 대표 스칼라 값 (틱마다 계산, 저장하지 않음)
pub type FlatMetrics = BTreeMap<String, f64>;

/// 시스템 메트릭 스냅샷
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSnapshot {
    /// 수집 시각 (Unix 초)
    pub timestamp: i64,
    /// 호스트 이름
    pub hostname: String,
    /// CPU 사용률
    pub cpu: CpuUsage,
    /// 메모리 사용량
    pub memory: UsageStats,
    /// 디스크 사용량 (루트 파티션)
    pub disk: UsageStats,
}

/// CPU 사용률 (0.0 ~ 100.0)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpuUsage {
    /// 코어별 사용률 (코어 순서 유지)
    pub per_core: Vec<f64>,
    /// 전체 코어 평균
    pub average: f64,
}

/// 용량형 리소스 사용량 (메모리, 디스크)
///
/// `free`는 OS 집계 방식에 따라 캐시를 제외할 수 있으므로
/// `used + free == total`이 정확히 성립하지 않을 수 있다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageStats {
    /// 전체 용량 (바이트)
    pub total: u64,
    /// 사용량 (바이트)
    pub used: u64,
    /// 여유 용량 (바이트)
    pub free: u64,
    /// 사용률 (0.0 ~ 100.0)
    pub percent: f64,
}

impl MetricSnapshot {
    /// 알림 평가용 대표 스칼라 추출
    ///
    /// `cpu` → `cpu.average`, `memory` → `memory.percent`, `disk` → `disk.percent`
    pub fn flatten(&self) -> FlatMetrics {
        let mut flat = FlatMetrics::new();
        flat.insert(METRIC_CPU.to_string(), self.cpu.average);
        flat.insert(METRIC_MEMORY.to_string(), self.memory.percent);
        flat.insert(METRIC_DISK.to_string(), self.disk.percent);
        flat
    }
}

impl CpuUsage {
    /// 코어별 사용률로부터 평균 계산 (코어 목록이 비면 0.0)
    pub fn from_per_core(per_core: Vec<f64>) -> Self {
        let average = if per_core.is_empty() {
            0.0
        } else {
            per_core.iter().sum::<f64>() / per_core.len() as f64
        };
        Self { per_core, average }
    }
}
