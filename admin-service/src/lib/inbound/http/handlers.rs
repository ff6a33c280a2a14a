use axum::extract::rejection::JsonRejection;
use axum::http::header;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use super::cookies::clear_session_cookie;
use crate::admin::errors::AdminError;

pub mod change_password;
pub mod health;
pub mod login;
pub mod logout;
pub mod me;
pub mod setup;
pub mod status;
pub mod validate_password;
pub mod verify;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

/// Every failure the HTTP layer can report, each with a fixed status and
/// machine-readable code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    BadRequest(String),
    UnprocessableEntity(String),
    Validation(Vec<String>),
    InvalidCredentials,
    TokenMissing,
    TokenInvalid,
    Conflict { code: &'static str, message: String },
    TooManyRequests { retry_after_secs: u64 },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidCredentials | ApiError::TokenMissing => StatusCode::UNAUTHORIZED,
            ApiError::TokenInvalid => StatusCode::FORBIDDEN,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::TooManyRequests { .. } => StatusCode::TOO_MANY_REQUESTS,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InternalServerError(_) => "INTERNAL_ERROR",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::UnprocessableEntity(_) => "UNPROCESSABLE_ENTITY",
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::InvalidCredentials => "INVALID_CREDENTIALS",
            ApiError::TokenMissing => "TOKEN_MISSING",
            ApiError::TokenInvalid => "TOKEN_INVALID",
            ApiError::Conflict { code, .. } => *code,
            ApiError::TooManyRequests { .. } => "RATE_LIMITED",
        }
    }

    fn into_data(self) -> ApiErrorData {
        let code = self.code().to_string();
        match self {
            ApiError::InternalServerError(detail) => {
                tracing::error!(error = %detail, "Request failed");
                ApiErrorData::new("Internal server error", code)
            }
            ApiError::BadRequest(message)
            | ApiError::UnprocessableEntity(message)
            | ApiError::Conflict { message, .. } => ApiErrorData::new(message, code),
            ApiError::Validation(errors) => ApiErrorData {
                errors: Some(errors),
                ..ApiErrorData::new("Password does not meet requirements", code)
            },
            ApiError::InvalidCredentials => ApiErrorData::new("Invalid credentials", code),
            ApiError::TokenMissing => ApiErrorData::new("Authentication required", code),
            ApiError::TokenInvalid => ApiErrorData::new("Invalid or expired token", code),
            ApiError::TooManyRequests { retry_after_secs } => ApiErrorData {
                retry_after: Some(retry_after_secs),
                ..ApiErrorData::new("Too many login attempts, try again later", code)
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let extra_header = match &self {
            ApiError::TooManyRequests { retry_after_secs } => {
                Some((header::RETRY_AFTER, HeaderValue::from(*retry_after_secs)))
            }
            ApiError::TokenInvalid => HeaderValue::from_str(&clear_session_cookie())
                .ok()
                .map(|value| (header::SET_COOKIE, value)),
            _ => None,
        };

        let mut response =
            (status, Json(ApiResponseBody::new_error(status, self.into_data()))).into_response();
        if let Some((name, value)) = extra_header {
            response.headers_mut().insert(name, value);
        }
        response
    }
}

impl From<AdminError> for ApiError {
    fn from(err: AdminError) -> Self {
        match err {
            AdminError::InvalidUsername(_) => ApiError::UnprocessableEntity(err.to_string()),
            AdminError::WeakPassword(errors) => ApiError::Validation(errors),
            AdminError::AlreadyConfigured => ApiError::Conflict {
                code: "ALREADY_CONFIGURED",
                message: err.to_string(),
            },
            AdminError::SetupRequired => ApiError::Conflict {
                code: "SETUP_REQUIRED",
                message: err.to_string(),
            },
            AdminError::InvalidCredentials => ApiError::InvalidCredentials,
            AdminError::RateLimited { retry_after_secs } => {
                ApiError::TooManyRequests { retry_after_secs }
            }
            AdminError::TokenMissing => ApiError::TokenMissing,
            AdminError::TokenInvalid => ApiError::TokenInvalid,
            AdminError::Storage(_) | AdminError::Unknown(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, data: ApiErrorData) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
}

impl ApiErrorData {
    fn new(message: impl Into<String>, code: String) -> Self {
        Self {
            message: message.into(),
            code,
            errors: None,
            retry_after: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_errors_map_to_fixed_codes() {
        let cases = [
            (AdminError::AlreadyConfigured, StatusCode::CONFLICT, "ALREADY_CONFIGURED"),
            (AdminError::SetupRequired, StatusCode::CONFLICT, "SETUP_REQUIRED"),
            (AdminError::InvalidCredentials, StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
            (AdminError::TokenMissing, StatusCode::UNAUTHORIZED, "TOKEN_MISSING"),
            (AdminError::TokenInvalid, StatusCode::FORBIDDEN, "TOKEN_INVALID"),
            (
                AdminError::RateLimited { retry_after_secs: 30 },
                StatusCode::TOO_MANY_REQUESTS,
                "RATE_LIMITED",
            ),
            (
                AdminError::WeakPassword(vec!["too short".to_string()]),
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
            ),
            (
                AdminError::Storage("disk on fire".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
            ),
        ];

        for (admin_error, status, code) in cases {
            let api_error = ApiError::from(admin_error);
            assert_eq!(api_error.status(), status);
            assert_eq!(api_error.code(), code);
        }
    }

    #[test]
    fn test_rate_limited_response_sets_retry_after() {
        let response = ApiError::TooManyRequests { retry_after_secs: 42 }.into_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "42");
    }

    #[test]
    fn test_token_invalid_response_clears_cookie() {
        let response = ApiError::TokenInvalid.into_response();

        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("admin_token=;"));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[test]
    fn test_internal_error_hides_detail() {
        let data = ApiError::InternalServerError("connection refused".to_string()).into_data();

        assert_eq!(data.message, "Internal server error");
        assert_eq!(data.errors, None);
    }

    #[test]
    fn test_validation_error_lists_every_rule() {
        let errors = vec!["one".to_string(), "two".to_string()];
        let data = ApiError::Validation(errors.clone()).into_data();

        assert_eq!(data.code, "VALIDATION_ERROR");
        assert_eq!(data.errors, Some(errors));
    }
}
