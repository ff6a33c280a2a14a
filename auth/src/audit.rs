//! Structured audit events for authentication outcomes.
//!
//! Events are emitted, not stored. Where they end up is the sink's concern;
//! the default sink hands them to `tracing` under the `audit` target so the
//! subscriber decides the destination.

use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

/// Kind of auth-relevant action being audited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditEventKind {
    SetupCompleted,
    SetupRejected,
    LoginSuccess,
    LoginFailed,
    LoginRateLimited,
    Logout,
    TokenMissing,
    TokenInvalid,
    PasswordChanged,
    PasswordChangeFailed,
    PasswordValidationFailed,
}

/// One audited action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    pub timestamp: DateTime<Utc>,
    pub event: AuditEventKind,
    pub identifier: String,
    pub ip: String,
    pub user_agent: Option<String>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AuditEvent {
    pub fn success(event: AuditEventKind, identifier: impl ToString, ip: impl ToString) -> Self {
        Self {
            timestamp: Utc::now(),
            event,
            identifier: identifier.to_string(),
            ip: ip.to_string(),
            user_agent: None,
            success: true,
            error: None,
        }
    }

    pub fn failure(
        event: AuditEventKind,
        identifier: impl ToString,
        ip: impl ToString,
        error: impl ToString,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            event,
            identifier: identifier.to_string(),
            ip: ip.to_string(),
            user_agent: None,
            success: false,
            error: Some(error.to_string()),
        }
    }

    pub fn with_user_agent(mut self, user_agent: Option<String>) -> Self {
        self.user_agent = user_agent;
        self
    }
}

/// Destination for audit events.
///
/// Recording is best-effort: a sink must never fail the request that
/// produced the event.
pub trait AuditSink: Send + Sync + 'static {
    fn record(&self, event: &AuditEvent);
}

/// Writes each event as a JSON object through `tracing`.
#[derive(Debug, Clone, Default)]
pub struct TracingAuditSink;

impl TracingAuditSink {
    pub fn new() -> Self {
        Self
    }
}

impl AuditSink for TracingAuditSink {
    fn record(&self, event: &AuditEvent) {
        match serde_json::to_string(event) {
            Ok(json) if event.success => {
                tracing::info!(target: "audit", event = %json, "Auth event")
            }
            Ok(json) => tracing::warn!(target: "audit", event = %json, "Auth event"),
            Err(e) => tracing::error!(
                target: "audit",
                error = %e,
                kind = ?event.event,
                "Failed to serialize audit event"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_shape() {
        let event = AuditEvent::failure(
            AuditEventKind::LoginFailed,
            "admin",
            "10.0.0.1",
            "bad password",
        )
        .with_user_agent(Some("curl/8.0".to_string()));

        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["event"], "LOGIN_FAILED");
        assert_eq!(json["identifier"], "admin");
        assert_eq!(json["ip"], "10.0.0.1");
        assert_eq!(json["userAgent"], "curl/8.0");
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "bad password");
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn test_successful_event_omits_error() {
        let event = AuditEvent::success(AuditEventKind::Logout, "admin", "10.0.0.1");

        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["event"], "LOGOUT");
        assert_eq!(json["success"], true);
        assert!(json.get("error").is_none());
        assert!(json["userAgent"].is_null());
    }

    #[test]
    fn test_tracing_sink_does_not_panic_without_subscriber() {
        TracingAuditSink::new().record(&AuditEvent::success(
            AuditEventKind::LoginSuccess,
            "admin",
            "127.0.0.1",
        ));
    }
}
