use std::net::SocketAddr;

use axum::async_trait;
use axum::extract::ConnectInfo;
use axum::extract::FromRequest;
use axum::extract::Request;
use axum::Json;
use serde::de::DeserializeOwned;

use super::client::client_context;
use super::handlers::ApiError;
use super::router::AppState;
use crate::domain::admin::ports::AdminServicePort;

/// Request bodies that carry a password about to become the admin password.
pub trait CandidatePassword {
    fn candidate_password(&self) -> &str;
}

/// JSON body whose candidate password already passed the password policy.
///
/// Rejects with `VALIDATION_ERROR` before the handler runs, so weak
/// passwords never reach hashing and never count as failed logins.
#[derive(Debug)]
pub struct ValidatedPassword<T>(pub T);

#[async_trait]
impl<T> FromRequest<AppState> for ValidatedPassword<T>
where
    T: DeserializeOwned + CandidatePassword + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let client = client_context(
            req.headers(),
            req.extensions().get::<ConnectInfo<SocketAddr>>(),
            state.trust_proxy,
        );

        let Json(payload) = Json::<T>::from_request(req, state).await?;

        state
            .admin_service
            .validate_password(payload.candidate_password(), &client)?;

        Ok(Self(payload))
    }
}
