//! InfluxDB v2 쓰기 어댑터.
//!
//! 스냅샷 1건을 line protocol 포인트 1개로 변환해 `/api/v2/write`로 보낸다.
//! measurement `system_metrics`, 태그 `host`, 초 단위 타임스탬프.

use async_trait::async_trait;
use hostwatch_core::config::StorageConfig;
use hostwatch_core::error::CoreError;
use hostwatch_core::models::snapshot::MetricSnapshot;
use hostwatch_core::ports::storage::MetricsSink;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Url;
use std::time::Duration;
use tracing::debug;

use crate::http::{build_client, check_response};

/// measurement 이름
pub const MEASUREMENT: &str = "system_metrics";

/// InfluxDB line protocol 쓰기
pub struct InfluxWriter {
    client: reqwest::Client,
    write_url: Url,
    token: Option<String>,
}

impl InfluxWriter {
    /// 설정에서 생성
    pub fn new(config: &StorageConfig, token: Option<String>) -> Result<Self, CoreError> {
        let base = config.url.trim_end_matches('/');
        let write_url = Url::parse_with_params(
            &format!("{base}/api/v2/write"),
            &[
                ("org", config.org.as_str()),
                ("bucket", config.bucket.as_str()),
                ("precision", "s"),
            ],
        )
        .map_err(|e| CoreError::Config(format!("storage.url 오류: {e}")))?;

        Ok(Self {
            client: build_client(Duration::from_secs(config.timeout_secs))?,
            write_url,
            token,
        })
    }
}

/// 스냅샷 → line protocol 한 줄
pub fn to_line_protocol(snapshot: &MetricSnapshot) -> String {
    format!(
        "{MEASUREMENT},host={} cpu_avg={},memory_used={}i,memory_total={}i {}",
        escape_tag(&snapshot.hostname),
        snapshot.cpu.average,
        snapshot.memory.used,
        snapshot.memory.total,
        snapshot.timestamp
    )
}

/// 태그 값 이스케이프 (백슬래시, 쉼표, 등호, 공백). 제어 문자는 버린다.
fn escape_tag(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars().filter(|c| !c.is_control()) {
        if matches!(c, '\\' | ',' | '=' | ' ') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[async_trait]
impl MetricsSink for InfluxWriter {
    async fn write(&self, snapshot: &MetricSnapshot) -> Result<(), CoreError> {
        let mut req = self
            .client
            .post(self.write_url.clone())
            .header(CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(to_line_protocol(snapshot));
        if let Some(token) = &self.token {
            req = req.header(AUTHORIZATION, format!("Token {token}"));
        }

        let resp = req
            .send()
            .await
            .map_err(|e| CoreError::Transport(format!("InfluxDB 쓰기 실패: {e}")))?;
        check_response(resp).await?;

        debug!(host = %snapshot.hostname, timestamp = snapshot.timestamp, "InfluxDB 쓰기 완료");
        Ok(())
    }
}
