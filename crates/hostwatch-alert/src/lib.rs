//! # hostwatch-alert
//!
//! 임계값 평가와 알림 전달.
//!
//! - [`evaluator`]: 평탄화 메트릭 + 임계값 + 쿨다운 → `AlertEvent`
//! - [`dispatcher`]: 이벤트 1건을 모든 활성 채널로 동시 전달 (실패는 삼킴)
//! - [`channels`]: log / email / chat webhook 채널 구현
//! - [`retry`]: 고정 간격 재시도 정책

pub mod channels;
pub mod dispatcher;
pub mod evaluator;
pub mod retry;

pub use dispatcher::Dispatcher;
pub use evaluator::{evaluate, CooldownState};
pub use retry::RetryPolicy;
