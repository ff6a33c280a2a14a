use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::domain::admin::ports::AdminServicePort;

/// Periodically drop expired throttle records and revocations.
///
/// The first sweep runs one full interval after spawning. Abort the returned
/// handle to stop it.
pub fn spawn_sweeper<S>(service: Arc<S>, interval: Duration) -> JoinHandle<()>
where
    S: AdminServicePort,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let report = service.purge_expired();
            tracing::debug!(
                login_attempts = report.login_attempts,
                revocations = report.revocations,
                "Expired security state swept"
            );
        }
    })
}

#[cfg(test)]
mod tests {
    use auth::AuditSink;
    use auth::Authenticator;
    use auth::LoginThrottle;
    use auth::SigningSecret;
    use auth::TokenSettings;
    use auth::TracingAuditSink;

    use super::*;
    use crate::domain::admin::models::Username;
    use crate::domain::admin::service::AdminService;
    use crate::outbound::credentials::InMemoryCredentialStore;

    #[tokio::test]
    async fn test_sweeper_purges_stale_attempts() {
        let secret =
            SigningSecret::new("test-secret-key-for-jwt-signing-at-least-32-bytes").unwrap();
        let throttle = Arc::new(LoginThrottle::new());
        let service = Arc::new(AdminService::new(
            Arc::new(InMemoryCredentialStore::new(
                Username::new("admin".to_string()).unwrap(),
            )),
            Arc::new(Authenticator::new(&secret, TokenSettings::default())),
            Arc::clone(&throttle),
            Arc::new(TracingAuditSink::new()) as Arc<dyn AuditSink>,
        ));

        let long_ago = chrono::Utc::now() - chrono::Duration::hours(1);
        throttle.record_attempt_at("198.51.100.7", false, long_ago);
        throttle.record_attempt("203.0.113.9", false);
        assert_eq!(throttle.tracked_identifiers(), 2);

        let handle = spawn_sweeper(service, Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(150)).await;
        handle.abort();

        assert_eq!(throttle.tracked_identifiers(), 1);
        assert_eq!(throttle.attempts("203.0.113.9"), 1);
    }
}
