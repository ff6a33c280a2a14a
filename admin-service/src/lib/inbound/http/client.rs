use std::convert::Infallible;
use std::net::SocketAddr;

use axum::async_trait;
use axum::extract::ConnectInfo;
use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use super::router::AppState;
use crate::domain::admin::models::ClientContext;

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REAL_IP: &str = "x-real-ip";

/// Identify the caller for throttling and audit.
///
/// Without `trust_proxy` the TCP peer address is authoritative and proxy
/// headers are ignored, since any client can set them. Behind a trusted
/// reverse proxy the order is: last `X-Forwarded-For` hop, `X-Real-IP`,
/// then the peer. `"unknown"` when nothing is available.
pub fn client_context(
    headers: &HeaderMap,
    connect_info: Option<&ConnectInfo<SocketAddr>>,
    trust_proxy: bool,
) -> ClientContext {
    let peer = connect_info.map(|ConnectInfo(addr)| addr.ip().to_string());

    let ip = if trust_proxy {
        forwarded_for(headers)
            .or_else(|| header_value(headers, X_REAL_IP))
            .or(peer)
    } else {
        peer
    }
    .unwrap_or_else(|| ClientContext::UNKNOWN_IP.to_string());

    let user_agent = header_value(headers, header::USER_AGENT.as_str());

    ClientContext::new(ip, user_agent)
}

// The proxy appends the address it saw, so only the last hop is reliable.
fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    headers
        .get(X_FORWARDED_FOR)?
        .to_str()
        .ok()?
        .rsplit(',')
        .map(str::trim)
        .find(|entry| !entry.is_empty())
        .map(str::to_string)
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)?
        .to_str()
        .ok()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl FromRequestParts<AppState> for ClientContext {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let connect_info = parts.extensions.get::<ConnectInfo<SocketAddr>>();
        Ok(client_context(&parts.headers, connect_info, state.trust_proxy))
    }
}
