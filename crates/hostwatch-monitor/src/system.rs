//! 시스템 리소스 모니터링.
//!
//! `SystemMonitor` 포트 구현. sysinfo 기반 코어별 CPU, 메모리, 루트 디스크 수집.

use async_trait::async_trait;
use hostwatch_core::error::CoreError;
use hostwatch_core::models::snapshot::{CpuUsage, MetricSnapshot, UsageStats};
use hostwatch_core::ports::monitor::SystemMonitor;
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use sysinfo::{Disk, Disks, System, MINIMUM_CPU_UPDATE_INTERVAL};
use tracing::debug;

/// 호스트 이름을 알 수 없을 때 사용하는 값
const FALLBACK_HOSTNAME: &str = "localhost";

/// sysinfo 기반 시스템 모니터
pub struct SysInfoMonitor {
    sys: Mutex<System>,
    /// CPU 기준점 갱신 시각
    cpu_baseline: Instant,
    hostname: String,
}

impl SysInfoMonitor {
    /// 새 시스템 모니터 생성 (`hostname`이 None이면 OS 호스트 이름)
    pub fn new(hostname: Option<String>) -> Self {
        let mut sys = System::new();
        // 첫 샘플의 CPU 사용률 기준점
        sys.refresh_cpu_usage();
        sys.refresh_memory();

        Self {
            sys: Mutex::new(sys),
            cpu_baseline: Instant::now(),
            hostname: resolve_hostname(hostname),
        }
    }

    /// 스냅샷에 기록되는 호스트 이름
    pub fn hostname(&self) -> &str {
        &self.hostname
    }
}

/// 호스트 이름 결정: 설정 오버라이드 → OS → 기본값
pub fn resolve_hostname(overridden: Option<String>) -> String {
    overridden
        .filter(|h| !h.trim().is_empty())
        .or_else(System::host_name)
        .filter(|h| !h.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_HOSTNAME.to_string())
}

/// 사용률 계산 (0~100으로 제한, total 0이면 0)
fn percent(used: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    clamp_percent(used as f64 / total as f64 * 100.0)
}

/// 기준점 이후 sysinfo 최소 갱신 간격까지 남은 시간
fn cpu_settle_delay(since_baseline: Duration) -> Duration {
    MINIMUM_CPU_UPDATE_INTERVAL.saturating_sub(since_baseline)
}

fn clamp_percent(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// `/`에 마운트된 디스크, 없으면 가장 큰 디스크
fn root_disk(disks: &Disks) -> Option<&Disk> {
    disks
        .list()
        .iter()
        .find(|d| d.mount_point() == Path::new("/"))
        .or_else(|| disks.list().iter().max_by_key(|d| d.total_space()))
}

fn disk_usage(disks: &Disks) -> UsageStats {
    match root_disk(disks) {
        Some(disk) => {
            let total = disk.total_space();
            let free = disk.available_space().min(total);
            let used = total - free;
            UsageStats {
                total,
                used,
                free,
                percent: percent(used, total),
            }
        }
        None => UsageStats {
            total: 0,
            used: 0,
            free: 0,
            percent: 0.0,
        },
    }
}

#[async_trait]
impl SystemMonitor for SysInfoMonitor {
    async fn collect_snapshot(&self) -> Result<MetricSnapshot, CoreError> {
        // 기준점 직후의 CPU 사용률은 의미가 없다
        let wait = cpu_settle_delay(self.cpu_baseline.elapsed());
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }

        let (cpu, memory) = {
            let mut sys = self
                .sys
                .lock()
                .map_err(|e| CoreError::Monitor(format!("시스템 잠금 실패: {e}")))?;
            sys.refresh_cpu_usage();
            sys.refresh_memory();

            let per_core = sys
                .cpus()
                .iter()
                .map(|c| clamp_percent(c.cpu_usage() as f64))
                .collect();

            let total = sys.total_memory();
            let free = sys.available_memory().min(total);
            let used = sys.used_memory().min(total);
            let memory = UsageStats {
                total,
                used,
                free,
                percent: percent(total - free, total),
            };

            (CpuUsage::from_per_core(per_core), memory)
        };

        let disks = Disks::new_with_refreshed_list();
        let disk = disk_usage(&disks);

        let snapshot = MetricSnapshot {
            timestamp: chrono::Utc::now().timestamp(),
            hostname: self.hostname.clone(),
            cpu,
            memory,
            disk,
        };

        debug!(
            "시스템 메트릭: CPU {:.1}%, 메모리 {:.1}%, 디스크 {:.1}%",
            snapshot.cpu.average, snapshot.memory.percent, snapshot.disk.percent
        );

        Ok(snapshot)
    }
}
