use auth::PasswordPolicy;
use auth::PasswordReport;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;

/// Advisory strength check for password forms. Not audited.
pub async fn validate_password(
    payload: Result<Json<ValidatePasswordRequest>, JsonRejection>,
) -> Result<ApiSuccess<PasswordReport>, ApiError> {
    let Json(body) = payload?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        PasswordPolicy::new().validate(&body.password),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ValidatePasswordRequest {
    password: String,
}
