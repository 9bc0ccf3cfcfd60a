//! tracing 초기화.
//!
//! `RUST_LOG`가 있으면 그대로 쓰고, 없으면 `--log-level`을 hostwatch 크레이트에 적용한다.
//! 출력은 사람이 읽는 형식 또는 JSON, 대상은 stdout 또는 파일.

use std::path::Path;

use anyhow::{anyhow, Result};
use clap::ValueEnum;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

/// 로그 출력 형식
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// 사람이 읽는 형식
    Pretty,
    /// 한 줄 JSON
    Json,
}

const CRATES: &[&str] = &[
    "hostwatch",
    "hostwatch_app",
    "hostwatch_core",
    "hostwatch_monitor",
    "hostwatch_alert",
    "hostwatch_network",
    "hostwatch_storage",
    "hostwatch_web",
];

/// 기본 필터: 외부 크레이트는 warn, hostwatch 크레이트는 `level`
pub fn default_directive(level: &str) -> String {
    let mut directive = String::from("warn");
    for krate in CRATES {
        directive.push_str(&format!(",{krate}={level}"));
    }
    directive.push_str(&format!(",tower_http={level}"));
    directive
}

/// 전역 subscriber 설치
///
/// 파일 출력일 때 반환되는 guard는 프로세스 종료까지 유지해야 한다.
pub fn init(level: &str, format: LogFormat, file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive(level)))
        .map_err(|e| anyhow!("로그 필터 오류: {e}"))?;

    let (writer, guard) = match file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .ok_or_else(|| anyhow!("로그 파일 이름이 없습니다: {}", path.display()))?;
            let appender = tracing_appender::rolling::never(dir, name);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            (BoxMakeWriter::new(non_blocking), Some(guard))
        }
        None => (BoxMakeWriter::new(std::io::stdout), None),
    };

    let fmt_layer: Box<dyn Layer<Registry> + Send + Sync> = match format {
        LogFormat::Json => fmt::layer().json().with_writer(writer).boxed(),
        LogFormat::Pretty => fmt::layer().with_target(true).with_writer(writer).boxed(),
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(filter)
        .try_init()
        .map_err(|e| anyhow!("tracing 초기화 실패: {e}"))?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directive_applies_level_to_all_crates() {
        let directive = default_directive("debug");
        assert!(directive.starts_with("warn,"));
        assert!(directive.contains("hostwatch_alert=debug"));
        assert!(directive.contains("hostwatch_web=debug"));
        assert!(EnvFilter::try_new(&directive).is_ok());
    }
}
