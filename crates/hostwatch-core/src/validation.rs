//! 수집 페이로드 스키마 검증.
//!
//! 원시 JSON 바이트를 [`MetricSnapshot`]으로 변환하면서 타입, 필수 필드,
//! 수치 범위를 검사한다. 첫 실패에서 멈추지 않고 모든 필드 오류를 모아 반환한다.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::models::snapshot::{CpuUsage, MetricSnapshot, UsageStats};

/// `used + free`가 `total`을 넘을 수 있는 허용 비율 (OS 집계 오차)
pub const CAPACITY_TOLERANCE: f64 = 0.05;

/// 필드 단위 검증 실패
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    /// 필드 경로 (예: "memory.percent", "cpu.per_core[2]")
    pub field: String,
    /// 실패 사유
    pub message: String,
}

impl FieldError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// 원시 요청 본문을 검증된 스냅샷으로 변환
pub fn parse_snapshot(body: &[u8]) -> Result<MetricSnapshot, Vec<FieldError>> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| vec![FieldError::new("body", format!("JSON 파싱 실패: {e}"))])?;

    let Some(root) = value.as_object() else {
        return Err(vec![FieldError::new("body", "JSON 객체가 아닙니다")]);
    };

    let mut walker = Walker::default();
    let timestamp = walker.int(root, "", "timestamp");
    let hostname = walker.string(root, "", "hostname");
    let cpu = walker.cpu(root);
    let memory = walker.usage(root, "memory");
    let disk = walker.usage(root, "disk");

    match (timestamp, hostname, cpu, memory, disk) {
        (Some(timestamp), Some(hostname), Some(cpu), Some(memory), Some(disk))
            if walker.errors.is_empty() =>
        {
            let snapshot = MetricSnapshot {
                timestamp,
                hostname,
                cpu,
                memory,
                disk,
            };
            let errors = validate_snapshot(&snapshot);
            if errors.is_empty() {
                Ok(snapshot)
            } else {
                Err(errors)
            }
        }
        _ => Err(walker.errors),
    }
}

/// 타입이 맞는 스냅샷의 불변식 검사 (범위, 용량 관계)
pub fn validate_snapshot(snapshot: &MetricSnapshot) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if snapshot.timestamp < 0 {
        errors.push(FieldError::new("timestamp", "음수가 될 수 없습니다"));
    }
    if snapshot.hostname.trim().is_empty() {
        errors.push(FieldError::new("hostname", "비어 있을 수 없습니다"));
    } else if snapshot.hostname.chars().any(char::is_control) {
        errors.push(FieldError::new("hostname", "제어 문자를 포함할 수 없습니다"));
    }

    for (i, core) in snapshot.cpu.per_core.iter().enumerate() {
        check_percent(&mut errors, &format!("cpu.per_core[{i}]"), *core);
    }
    check_percent(&mut errors, "cpu.average", snapshot.cpu.average);

    check_usage(&mut errors, "memory", &snapshot.memory);
    check_usage(&mut errors, "disk", &snapshot.disk);

    errors
}

fn check_percent(errors: &mut Vec<FieldError>, field: &str, value: f64) {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        errors.push(FieldError::new(
            field,
            format!("0~100 범위를 벗어남: {value}"),
        ));
    }
}

fn check_usage(errors: &mut Vec<FieldError>, prefix: &str, stats: &UsageStats) {
    check_percent(errors, &format!("{prefix}.percent"), stats.percent);

    if stats.used > stats.total {
        errors.push(FieldError::new(
            format!("{prefix}.used"),
            format!("total({})을 초과함: {}", stats.total, stats.used),
        ));
    }
    if stats.free > stats.total {
        errors.push(FieldError::new(
            format!("{prefix}.free"),
            format!("total({})을 초과함: {}", stats.total, stats.free),
        ));
    }

    let limit = stats.total as f64 * (1.0 + CAPACITY_TOLERANCE);
    if (stats.used as f64 + stats.free as f64) > limit {
        errors.push(FieldError::new(
            format!("{prefix}.free"),
            "used + free가 total을 크게 초과함",
        ));
    }
}

/// JSON 트리 순회 중 발생한 오류 수집기
#[derive(Default)]
struct Walker {
    errors: Vec<FieldError>,
}

impl Walker {
    fn field<'a>(&mut self, obj: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
        let key = path.rsplit('.').next().unwrap_or(path);
        match obj.get(key) {
            Some(Value::Null) | None => {
                self.errors.push(FieldError::new(path, "필수 필드 누락"));
                None
            }
            Some(v) => Some(v),
        }
    }

    fn int(&mut self, obj: &Map<String, Value>, prefix: &str, key: &str) -> Option<i64> {
        let path = join(prefix, key);
        let value = self.field(obj, &path)?;
        match value.as_i64() {
            Some(n) => Some(n),
            None => {
                self.errors.push(FieldError::new(path, "정수가 아닙니다"));
                None
            }
        }
    }

    fn bytes(&mut self, obj: &Map<String, Value>, prefix: &str, key: &str) -> Option<u64> {
        let path = join(prefix, key);
        let value = self.field(obj, &path)?;
        if let Some(n) = value.as_u64() {
            return Some(n);
        }
        let message = if value.as_i64().is_some() {
            "음수가 될 수 없습니다"
        } else {
            "정수가 아닙니다"
        };
        self.errors.push(FieldError::new(path, message));
        None
    }

    fn float(&mut self, obj: &Map<String, Value>, prefix: &str, key: &str) -> Option<f64> {
        let path = join(prefix, key);
        let value = self.field(obj, &path)?;
        match value.as_f64() {
            Some(n) => Some(n),
            None => {
                self.errors.push(FieldError::new(path, "숫자가 아닙니다"));
                None
            }
        }
    }

    fn string(&mut self, obj: &Map<String, Value>, prefix: &str, key: &str) -> Option<String> {
        let path = join(prefix, key);
        let value = self.field(obj, &path)?;
        match value.as_str() {
            Some(s) => Some(s.to_string()),
            None => {
                self.errors.push(FieldError::new(path, "문자열이 아닙니다"));
                None
            }
        }
    }

    fn object<'a>(&mut self, obj: &'a Map<String, Value>, key: &str) -> Option<&'a Map<String, Value>> {
        let value = self.field(obj, key)?;
        match value.as_object() {
            Some(o) => Some(o),
            None => {
                self.errors.push(FieldError::new(key, "객체가 아닙니다"));
                None
            }
        }
    }

    fn cpu(&mut self, root: &Map<String, Value>) -> Option<CpuUsage> {
        let cpu = self.object(root, "cpu")?;

        let per_core = match self.field(cpu, "cpu.per_core") {
            Some(Value::Array(items)) => {
                let mut cores = Vec::with_capacity(items.len());
                let mut ok = true;
                for (i, item) in items.iter().enumerate() {
                    match item.as_f64() {
                        Some(v) => cores.push(v),
                        None => {
                            ok = false;
                            self.errors
                                .push(FieldError::new(format!("cpu.per_core[{i}]"), "숫자가 아닙니다"));
                        }
                    }
                }
                ok.then_some(cores)
            }
            Some(_) => {
                self.errors.push(FieldError::new("cpu.per_core", "배열이 아닙니다"));
                None
            }
            None => None,
        };
        let average = self.float(cpu, "cpu", "average");

        Some(CpuUsage {
            per_core: per_core?,
            average: average?,
        })
    }

    fn usage(&mut self, root: &Map<String, Value>, key: &str) -> Option<UsageStats> {
        let obj = self.object(root, key)?;
        let total = self.bytes(obj, key, "total");
        let used = self.bytes(obj, key, "used");
        let free = self.bytes(obj, key, "free");
        let percent = self.float(obj, key, "percent");

        Some(UsageStats {
            total: total?,
            used: used?,
            free: free?,
            percent: percent?,
        })
    }
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}
