//! 고정 간격 재시도 정책.

use hostwatch_core::error::CoreError;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// 기본 최대 시도 횟수
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// 기본 재시도 간격
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);

/// 재시도 정책: 최대 `max_attempts`회, 시도 사이 `delay` 고정 대기
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// 최대 시도 횟수 (0은 1로 취급)
    pub max_attempts: u32,
    /// 시도 사이 대기 시간
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl RetryPolicy {
    /// 새 정책 생성
    pub const fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// 실제 시도 상한
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// 작업 실행
    ///
    /// `op(attempt)`를 성공할 때까지 최대 `attempts()`회 호출한다 (attempt는 1부터).
    /// 성공 시 `(결과, 시도 횟수)`, 모두 실패하면 `(마지막 에러, 시도 횟수)`.
    /// 마지막 시도 후에는 대기하지 않는다.
    pub async fn run<F, Fut, T>(&self, mut op: F) -> Result<(T, u32), (CoreError, u32)>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        let max = self.attempts();
        let mut attempt = 1;
        loop {
            match op(attempt).await {
                Ok(value) => return Ok((value, attempt)),
                Err(e) if attempt >= max => return Err((e, attempt)),
                Err(e) => {
                    debug!("시도 {attempt}/{max} 실패: {e}, {:?} 후 재시도", self.delay);
                    tokio::time::sleep(self.delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
