//! hostwatch 핵심 에러 타입.
//!
//! 모든 어댑터 crate는 이 타입을 그대로 반환하거나 자체 에러 타입에서 래핑한다.

use thiserror::Error;

use crate::validation::FieldError;

/// 코어 레이어 에러.
/// 인증, 검증, 채널 전달, 전송, 설정 등 파이프라인 공통 에러를 정의한다.
#[derive(Debug, Error)]
pub enum CoreError {
    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 설정값 오류 (시작 시 치명적)
    #[error("설정 에러: {0}")]
    Config(String),

    /// 스냅샷 유효성 검증 실패 (필드별 사유 전체)
    #[error("유효성 검증 실패: {}", summarize(.fields))]
    Validation {
        /// 실패한 필드 목록
        fields: Vec<FieldError>,
    },

    /// 인증 실패 (수집 토큰 불일치)
    #[error("인증 에러: {0}")]
    Auth(String),

    /// 알림 채널 전달 실패 (이메일, 웹훅)
    #[error("{channel} 채널 전달 실패: {message}")]
    Channel {
        /// 채널 이름
        channel: String,
        /// 실패 사유
        message: String,
    },

    /// 외부 전송 실패 (클라우드 전달, 장기 저장소 쓰기)
    #[error("전송 에러: {0}")]
    Transport(String),

    /// 메트릭 샘플링 실패
    #[error("모니터링 에러: {0}")]
    Monitor(String),

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// 채널 전달 에러 생성 헬퍼
    pub fn channel(channel: impl Into<String>, message: impl Into<String>) -> Self {
        CoreError::Channel {
            channel: channel.into(),
            message: message.into(),
        }
    }
}

fn summarize(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| f.field.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_error_display() {
        let err = CoreError::channel("slack", "HTTP 500");
        let msg = err.to_string();
        assert!(msg.contains("slack"));
        assert!(msg.contains("HTTP 500"));
    }

    #[test]
    fn validation_error_display() {
        let err = CoreError::Validation {
            fields: vec![
                FieldError {
                    field: "memory.percent".to_string(),
                    message: "0~100 범위를 벗어남".to_string(),
                },
                FieldError {
                    field: "hostname".to_string(),
                    message: "필수 필드 누락".to_string(),
                },
            ],
        };
        assert_eq!(
            err.to_string(),
            "유효성 검증 실패: memory.percent, hostname"
        );
    }
}
