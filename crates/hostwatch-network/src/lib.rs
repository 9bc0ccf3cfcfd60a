//! # hostwatch-network
//!
//! 외부 HTTP 협력자 어댑터.
//!
//! - [`cloud::HttpCloudForwarder`]: 에이전트 → 원격 `/ingest` 전달 (`SnapshotForwarder`)
//! - [`influx::InfluxWriter`]: 수집 서버 → InfluxDB v2 line protocol 쓰기 (`MetricsSink`)
//!
//! 두 어댑터 모두 요청당 타임아웃만 두고 재시도하지 않는다.

pub mod cloud;
pub mod http;
pub mod influx;

pub use cloud::HttpCloudForwarder;
pub use influx::InfluxWriter;
