//! API 에러 처리.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use hostwatch_core::error::CoreError;
use hostwatch_core::validation::FieldError;
use serde::Serialize;
use thiserror::Error;

/// API 에러
#[derive(Debug, Error)]
pub enum ApiError {
    /// 수집 토큰 불일치
    #[error("인증 실패: {0}")]
    Unauthorized(String),

    /// 스냅샷 스키마 위반
    #[error("유효성 검증 실패: {}개 필드", .0.len())]
    Validation(Vec<FieldError>),

    /// 리소스를 찾을 수 없음
    #[error("리소스를 찾을 수 없음: {0}")]
    NotFound(String),

    /// 내부 서버 오류
    #[error("내부 서버 오류: {0}")]
    Internal(String),
}

/// 에러 응답 본문
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// 에러 메시지
    pub error: String,
    /// HTTP 상태 코드
    pub status: u16,
    /// 필드별 검증 실패 (검증 에러일 때만)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldError>,
}

impl ApiError {
    /// HTTP 상태 코드
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error = self.to_string();
        let fields = match self {
            ApiError::Validation(fields) => fields,
            _ => Vec::new(),
        };

        let body = ErrorResponse {
            error,
            status: status.as_u16(),
            fields,
        };

        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Auth(msg) => ApiError::Unauthorized(msg),
            CoreError::Validation { fields } => ApiError::Validation(fields),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            ApiError::Unauthorized("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Validation(Vec::new()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn core_validation_error_keeps_field() {
        let err: ApiError = CoreError::Validation {
            fields: vec![FieldError {
                field: "disk.percent".into(),
                message: "범위 초과".into(),
            }],
        }
        .into();
        match err {
            ApiError::Validation(fields) => assert_eq!(fields[0].field, "disk.percent"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn core_auth_error_maps_to_unauthorized() {
        let err: ApiError = CoreError::Auth("Invalid token".into()).into();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn other_core_errors_are_internal() {
        let err: ApiError = CoreError::Transport("InfluxDB 503".into()).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
