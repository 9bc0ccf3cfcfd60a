//! 클라우드 전달 어댑터.
//!
//! 수집한 스냅샷 JSON을 원격 수집 엔드포인트로 POST 한다.

use async_trait::async_trait;
use hostwatch_core::error::CoreError;
use hostwatch_core::models::snapshot::MetricSnapshot;
use hostwatch_core::ports::forwarder::SnapshotForwarder;
use std::time::Duration;
use tracing::debug;

use crate::http::{build_client, check_response};

/// HTTP 클라우드 전달기 (Bearer 토큰, 재시도 없음)
pub struct HttpCloudForwarder {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpCloudForwarder {
    /// 새 전달기 생성
    pub fn new(endpoint: &str, token: Option<String>, timeout: Duration) -> Result<Self, CoreError> {
        Ok(Self {
            client: build_client(timeout)?,
            endpoint: endpoint.to_string(),
            token,
        })
    }
}

#[async_trait]
impl SnapshotForwarder for HttpCloudForwarder {
    async fn forward(&self, snapshot: &MetricSnapshot) -> Result<(), CoreError> {
        let mut req = self.client.post(&self.endpoint).json(snapshot);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| CoreError::Transport(format!("클라우드 전송 실패: {e}")))?;
        check_response(resp).await?;

        debug!(endpoint = %self.endpoint, timestamp = snapshot.timestamp, "스냅샷 전달 완료");
        Ok(())
    }
}
