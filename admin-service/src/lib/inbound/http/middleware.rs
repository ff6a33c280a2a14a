use auth::Claims;
use axum::extract::Request;
use axum::extract::State;
use axum::middleware::Next;
use axum::response::Response;

use super::cookies::extract_session_token;
use super::handlers::ApiError;
use crate::domain::admin::models::ClientContext;
use crate::domain::admin::ports::AdminServicePort;
use crate::inbound::http::router::AppState;

/// Extension type carrying the verified session into handlers
#[derive(Debug, Clone)]
pub struct AuthenticatedAdmin {
    pub claims: Claims,
    /// Raw token, needed to revoke it on logout or password change.
    pub token: String,
}

/// Middleware that requires a valid, unrevoked session token from the
/// `Authorization` header or the session cookie
pub async fn authenticate(
    State(state): State<AppState>,
    client: ClientContext,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(token) = extract_session_token(req.headers()) else {
        return Err(state.admin_service.reject_missing_token(&client).into());
    };

    let claims = state.admin_service.authorize(&token, &client)?;

    req.extensions_mut()
        .insert(AuthenticatedAdmin { claims, token });

    Ok(next.run(req).await)
}

/// Middleware that turns away clients with too many recent failed attempts
pub async fn rate_limit(
    State(state): State<AppState>,
    client: ClientContext,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    state.admin_service.check_rate_limit(&client)?;

    Ok(next.run(req).await)
}
