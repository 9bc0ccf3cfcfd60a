//! 애플리케이션 설정 구조체.
//!
//! 수집 주기, 클라우드 엔드포인트, 임계값/쿨다운, 채널별 활성화 플래그,
//! 수집 서버, 장기 저장소 설정을 정의한다. 시작 시 한 번 로드되며 이후 불변.
//! 시크릿(토큰, 비밀번호, 웹훅 URL)은 파일이 아닌 환경변수에서 읽는다.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use crate::error::CoreError;
use crate::models::snapshot::{METRIC_CPU, METRIC_DISK, METRIC_MEMORY};

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 호스트 이름 오버라이드 (None이면 OS 호스트 이름)
    #[serde(default)]
    pub hostname: Option<String>,
    /// 수집 주기 (초)
    #[serde(default = "default_interval")]
    pub interval: u64,
    /// 클라우드 전달 설정
    #[serde(default)]
    pub cloud: CloudConfig,
    /// 알림 설정
    #[serde(default)]
    pub alerts: AlertsConfig,
    /// 수집 서버 설정
    #[serde(default)]
    pub ingest: IngestConfig,
    /// 장기 저장소 설정
    #[serde(default)]
    pub storage: StorageConfig,
}

// ============================================================
// 클라우드 전달 설정
// ============================================================

/// 클라우드 전달 설정. 수집한 스냅샷을 원격 `/ingest`로 POST
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudConfig {
    /// 전달 활성화 여부
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// 수집 엔드포인트 URL
    #[serde(default = "default_cloud_endpoint")]
    pub endpoint: String,
    /// 요청 타임아웃 (초)
    #[serde(default = "default_request_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_cloud_endpoint(),
            timeout_secs: default_request_timeout_secs(),
        }
    }
}

// ============================================================
// 알림 설정
// ============================================================

/// 알림 설정: 임계값, 쿨다운, 채널
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertsConfig {
    /// 메트릭별 임계값 (0~100)
    #[serde(default = "default_thresholds")]
    pub thresholds: BTreeMap<String, f64>,
    /// 동일 메트릭 재알림 최소 간격 (초)
    #[serde(default = "default_cooldown")]
    pub cooldown: u64,
    /// 이메일 채널
    #[serde(default)]
    pub email: EmailConfig,
    /// 채팅 웹훅 채널 (Slack 호환)
    #[serde(default)]
    pub slack: SlackConfig,
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            thresholds: default_thresholds(),
            cooldown: default_cooldown(),
            email: EmailConfig::default(),
            slack: SlackConfig::default(),
        }
    }
}

/// 평가기 입력용 임계값 설정 (불변)
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdConfig {
    /// 메트릭별 임계값
    pub thresholds: BTreeMap<String, f64>,
    /// 쿨다운
    pub cooldown: Duration,
}

impl AlertsConfig {
    /// 평가기용 임계값 설정 추출
    pub fn threshold_config(&self) -> ThresholdConfig {
        ThresholdConfig {
            thresholds: self.thresholds.clone(),
            cooldown: Duration::from_secs(self.cooldown),
        }
    }
}

/// 이메일 채널 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// 활성화 여부
    #[serde(default)]
    pub enabled: bool,
    /// SMTP 릴레이 호스트
    #[serde(default)]
    pub smtp_server: String,
    /// SMTP 포트 (STARTTLS)
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// 발신 주소 (SMTP 로그인 계정 겸용)
    #[serde(default)]
    pub sender: String,
    /// 수신 주소
    #[serde(default)]
    pub recipient: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_server: String::new(),
            smtp_port: default_smtp_port(),
            sender: String::new(),
            recipient: String::new(),
        }
    }
}

/// 채팅 웹훅 채널 설정 (URL은 시크릿)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlackConfig {
    /// 활성화 여부
    #[serde(default)]
    pub enabled: bool,
    /// 요청 타임아웃 (초)
    #[serde(default = "default_request_timeout_secs")]
    pub timeout_secs: u64,
    /// 최대 시도 횟수
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// 재시도 간 고정 대기 (초)
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            timeout_secs: default_request_timeout_secs(),
            max_attempts: default_max_attempts(),
            retry_delay_secs: default_retry_delay_secs(),
        }
    }
}

// ============================================================
// 수집 서버 설정
// ============================================================

/// 수집 서버 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// 바인드 호스트
    #[serde(default = "default_ingest_host")]
    pub host: String,
    /// 바인드 포트 (기본: 8000)
    #[serde(default = "default_ingest_port")]
    pub port: u16,
    /// 메모리 이력 최대 개수
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            host: default_ingest_host(),
            port: default_ingest_port(),
            history_capacity: default_history_capacity(),
        }
    }
}

// ============================================================
// 장기 저장소 설정
// ============================================================

/// 장기 저장소 설정 (InfluxDB v2 write API)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// 활성화 여부
    #[serde(default)]
    pub enabled: bool,
    /// InfluxDB URL
    #[serde(default = "default_influx_url")]
    pub url: String,
    /// 조직
    #[serde(default)]
    pub org: String,
    /// 버킷
    #[serde(default)]
    pub bucket: String,
    /// 쓰기 타임아웃 (초)
    #[serde(default = "default_request_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: default_influx_url(),
            org: String::new(),
            bucket: String::new(),
            timeout_secs: default_request_timeout_secs(),
        }
    }
}

// ============================================================
// 시크릿
// ============================================================

/// 시크릿 환경변수: 클라우드 전달 Bearer 토큰
pub const ENV_AUTH_TOKEN: &str = "AUTH_TOKEN";
/// 시크릿 환경변수: 수집 API 공유 토큰
pub const ENV_INGEST_TOKEN: &str = "INGEST_TOKEN";
/// 시크릿 환경변수: SMTP 비밀번호
pub const ENV_SMTP_PASSWORD: &str = "SMTP_PASSWORD";
/// 시크릿 환경변수: 채팅 웹훅 URL
pub const ENV_SLACK_WEBHOOK_URL: &str = "SLACK_WEBHOOK_URL";
/// 시크릿 환경변수: InfluxDB 토큰
pub const ENV_INFLUXDB_TOKEN: &str = "INFLUXDB_TOKEN";

/// 프로세스 전역 시크릿 (시작 시 한 번 로드)
#[derive(Clone, Default)]
pub struct Secrets {
    /// 클라우드 전달 Bearer 토큰
    pub auth_token: Option<String>,
    /// 수집 API 공유 토큰
    pub ingest_token: Option<String>,
    /// SMTP 비밀번호
    pub smtp_password: Option<String>,
    /// 채팅 웹훅 URL
    pub slack_webhook_url: Option<String>,
    /// InfluxDB 토큰
    pub influxdb_token: Option<String>,
}

impl Secrets {
    /// 환경변수에서 시크릿 로드 (빈 문자열은 미설정으로 취급)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 임의 조회 함수로 시크릿 로드
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            auth_token: get(ENV_AUTH_TOKEN),
            ingest_token: get(ENV_INGEST_TOKEN),
            smtp_password: get(ENV_SMTP_PASSWORD),
            slack_webhook_url: get(ENV_SLACK_WEBHOOK_URL),
            influxdb_token: get(ENV_INFLUXDB_TOKEN),
        }
    }
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn mask(v: &Option<String>) -> &'static str {
            if v.is_some() {
                "***"
            } else {
                "<unset>"
            }
        }
        f.debug_struct("Secrets")
            .field("auth_token", &mask(&self.auth_token))
            .field("ingest_token", &mask(&self.ingest_token))
            .field("smtp_password", &mask(&self.smtp_password))
            .field("slack_webhook_url", &mask(&self.slack_webhook_url))
            .field("influxdb_token", &mask(&self.influxdb_token))
            .finish()
    }
}

// ============================================================
// 기본값 / 검증
// ============================================================

impl AppConfig {
    /// 기본 설정 생성
    pub fn default_config() -> Self {
        Self {
            hostname: None,
            interval: default_interval(),
            cloud: CloudConfig::default(),
            alerts: AlertsConfig::default(),
            ingest: IngestConfig::default(),
            storage: StorageConfig::default(),
        }
    }

    /// 수집 주기
    pub fn collection_interval(&self) -> Duration {
        Duration::from_secs(self.interval)
    }

    /// 설정값 검증 (시작 시 1회, 실패하면 프로세스 중단)
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.interval == 0 {
            return Err(CoreError::Config("interval은 1초 이상이어야 합니다".into()));
        }

        for (metric, threshold) in &self.alerts.thresholds {
            if !threshold.is_finite() || !(0.0..=100.0).contains(threshold) {
                return Err(CoreError::Config(format!(
                    "임계값 범위 오류: {metric}={threshold} (0~100)"
                )));
            }
        }

        if self.ingest.history_capacity == 0 {
            return Err(CoreError::Config(
                "ingest.history_capacity는 1 이상이어야 합니다".into(),
            ));
        }

        if self.cloud.enabled && self.cloud.endpoint.trim().is_empty() {
            return Err(CoreError::Config("cloud.endpoint가 비어 있습니다".into()));
        }

        let email = &self.alerts.email;
        if email.enabled
            && (email.smtp_server.is_empty() || email.sender.is_empty() || email.recipient.is_empty())
        {
            return Err(CoreError::Config(
                "이메일 채널 활성화 시 smtp_server, sender, recipient가 필요합니다".into(),
            ));
        }

        if self.storage.enabled && (self.storage.org.is_empty() || self.storage.bucket.is_empty()) {
            return Err(CoreError::Config(
                "장기 저장소 활성화 시 org, bucket이 필요합니다".into(),
            ));
        }

        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

fn default_true() -> bool {
    true
}
fn default_interval() -> u64 {
    10
}
fn default_cloud_endpoint() -> String {
    "http://localhost:8000/ingest".to_string()
}
fn default_request_timeout_secs() -> u64 {
    5
}
fn default_thresholds() -> BTreeMap<String, f64> {
    BTreeMap::from([
        (METRIC_CPU.to_string(), 90.0),
        (METRIC_MEMORY.to_string(), 85.0),
        (METRIC_DISK.to_string(), 95.0),
    ])
}
fn default_cooldown() -> u64 {
    300
}
fn default_smtp_port() -> u16 {
    587
}
fn default_max_attempts() -> u32 {
    3
}
fn default_retry_delay_secs() -> u64 {
    2
}
fn default_ingest_host() -> String {
    "127.0.0.1".to_string()
}
fn default_ingest_port() -> u16 {
    8000
}
fn default_history_capacity() -> usize {
    1000
}
fn default_influx_url() -> String {
    "http://localhost:8086".to_string()
}
