//! # hostwatch-monitor
//!
//! sysinfo 기반 `SystemMonitor` 포트 구현.

pub mod system;

pub use system::SysInfoMonitor;
