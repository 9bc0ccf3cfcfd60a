//! hostwatch 도메인 모델.
//!
//! 에이전트-수집 서버 간 공유하는 핵심 데이터 구조체를 정의한다.
//! 모든 모델은 `serde` Serialize/Deserialize를 구현한다.

pub mod alert;
pub mod snapshot;
