//! # hostwatch-storage
//!
//! 수집 서버가 받은 스냅샷을 메모리에 보관하는 이력 버퍼.
//! 장기 저장은 `hostwatch-network`의 InfluxDB 어댑터가 담당한다.

pub mod history;

pub use history::{HistoryStore, DEFAULT_HISTORY_CAPACITY};
