//! 공용 HTTP 헬퍼.

use hostwatch_core::error::CoreError;
use std::time::Duration;
use tracing::warn;

/// 타임아웃이 설정된 클라이언트 생성
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, CoreError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| CoreError::Transport(format!("HTTP 클라이언트 빌드 실패: {e}")))
}

/// 응답 상태 코드 확인 (2xx 외에는 `Transport` 에러)
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, CoreError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let text = resp.text().await.unwrap_or_else(|e| {
        warn!("응답 본문 읽기 실패: {e}");
        String::new()
    });
    Err(CoreError::Transport(format!("HTTP {status}: {text}")))
}
