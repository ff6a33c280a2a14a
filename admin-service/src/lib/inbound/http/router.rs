use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header;
use axum::http::HeaderValue;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::change_password::change_password;
use super::handlers::health::health;
use super::handlers::login::login;
use super::handlers::logout::logout;
use super::handlers::me::me;
use super::handlers::setup::setup;
use super::handlers::status::status;
use super::handlers::validate_password::validate_password;
use super::handlers::verify::verify;
use super::middleware::authenticate as auth_middleware;
use super::middleware::rate_limit;
use crate::domain::admin::service::AdminService;
use crate::outbound::credentials::InMemoryCredentialStore;

#[derive(Clone)]
pub struct AppState {
    pub admin_service: Arc<AdminService<InMemoryCredentialStore>>,
    pub cookie_secure: bool,
    /// Whether proxy headers identify the client.
    pub trust_proxy: bool,
}

impl AppState {
    /// Session cookie lifetime, matching the token lifetime.
    pub fn session_max_age_secs(&self) -> i64 {
        self.admin_service.session_ttl().num_seconds()
    }
}

pub fn create_router(
    admin_service: Arc<AdminService<InMemoryCredentialStore>>,
    cookie_secure: bool,
    trust_proxy: bool,
) -> Router {
    let state = AppState {
        admin_service,
        cookie_secure,
        trust_proxy,
    };

    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/api/auth/status", get(status))
        .route("/api/auth/setup", post(setup))
        .route("/api/auth/validate-password", post(validate_password));

    let throttled_routes = Router::new()
        .route("/api/auth/login", post(login))
        .route_layer(middleware::from_fn_with_state(state.clone(), rate_limit));

    let protected_routes = Router::new()
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/me", get(me))
        .route("/api/auth/verify", get(verify))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Layers added later run first: authenticate, then rate limit
    let change_password_routes = Router::new()
        .route("/api/auth/change-password", post(change_password))
        .route_layer(middleware::from_fn_with_state(state.clone(), rate_limit))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    let security_headers = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=31536000; includeSubDomains"),
        ));

    Router::new()
        .merge(public_routes)
        .merge(throttled_routes)
        .merge(protected_routes)
        .merge(change_password_routes)
        .layer(security_headers)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
