use std::sync::Arc;

use async_trait::async_trait;
use auth::AuditEvent;
use auth::AuditEventKind;
use auth::AuditSink;
use auth::Authenticator;
use auth::Claims;
use auth::LoginThrottle;
use auth::PasswordPolicy;

use crate::domain::admin::errors::AdminError;
use crate::domain::admin::models::AdminStatus;
use crate::domain::admin::models::ChangePasswordCommand;
use crate::domain::admin::models::ClientContext;
use crate::domain::admin::models::LoginCommand;
use crate::domain::admin::models::Session;
use crate::domain::admin::models::SetupCommand;
use crate::domain::admin::models::SweepReport;
use crate::domain::admin::ports::AdminServicePort;
use crate::domain::admin::ports::CredentialStore;

const UNKNOWN_IDENTIFIER: &str = "unknown";

/// Domain service implementation for admin authentication.
///
/// Built once at startup and shared by every request handler; all mutable
/// state lives in the injected store, authenticator and throttle.
pub struct AdminService<CS>
where
    CS: CredentialStore,
{
    store: Arc<CS>,
    authenticator: Arc<Authenticator>,
    throttle: Arc<LoginThrottle>,
    policy: PasswordPolicy,
    audit: Arc<dyn AuditSink>,
}

impl<CS> AdminService<CS>
where
    CS: CredentialStore,
{
    /// Create a new admin service with injected dependencies.
    ///
    /// # Arguments
    /// * `store` - Credential persistence implementation
    /// * `authenticator` - Password hashing and token handling
    /// * `throttle` - Failed-login counter
    /// * `audit` - Destination for audit events
    pub fn new(
        store: Arc<CS>,
        authenticator: Arc<Authenticator>,
        throttle: Arc<LoginThrottle>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            store,
            authenticator,
            throttle,
            policy: PasswordPolicy::new(),
            audit,
        }
    }

    /// Lifetime of issued session tokens.
    pub fn session_ttl(&self) -> chrono::Duration {
        self.authenticator.token_ttl()
    }

    fn record(&self, event: AuditEvent, client: &ClientContext) {
        self.audit
            .record(&event.with_user_agent(client.user_agent.clone()));
    }

    /// Count a credential check against the client before it runs.
    ///
    /// # Errors
    /// * `RateLimited` - Client exhausted its failed attempts
    fn begin_credential_check(&self, client: &ClientContext) -> Result<(), AdminError> {
        self.throttle
            .try_begin_attempt(client.throttle_key())
            .map_err(|remaining| self.rate_limited(client, remaining))
    }

    fn rate_limited(&self, client: &ClientContext, remaining: chrono::Duration) -> AdminError {
        let retry_after_secs = remaining.num_seconds().max(1) as u64;

        tracing::warn!(ip = %client.ip, retry_after_secs, "Login attempt throttled");
        self.record(
            AuditEvent::failure(
                AuditEventKind::LoginRateLimited,
                &client.ip,
                &client.ip,
                "too many failed attempts",
            ),
            client,
        );

        AdminError::RateLimited { retry_after_secs }
    }

    fn log_failed_check(&self, client: &ClientContext) {
        tracing::warn!(
            ip = %client.ip,
            attempts = self.throttle.attempts(client.throttle_key()),
            "Failed credential check"
        );
    }

    async fn hash_password(&self, password: String) -> Result<String, AdminError> {
        let authenticator = Arc::clone(&self.authenticator);

        tokio::task::spawn_blocking(move || authenticator.hash_password(&password))
            .await
            .map_err(|e| AdminError::Unknown(format!("Password hashing task failed: {}", e)))?
            .map_err(|e| AdminError::Unknown(format!("Password hashing failed: {}", e)))
    }

    async fn verify_password(&self, password: String, hash: String) -> Result<bool, AdminError> {
        let authenticator = Arc::clone(&self.authenticator);

        tokio::task::spawn_blocking(move || authenticator.verify_password(&password, &hash))
            .await
            .map_err(|e| AdminError::Unknown(format!("Password verification task failed: {}", e)))
    }
}

#[async_trait]
impl<CS> AdminServicePort for AdminService<CS>
where
    CS: CredentialStore,
{
    async fn status(&self) -> Result<AdminStatus, AdminError> {
        let credential = self.store.load().await?;

        Ok(AdminStatus {
            setup_required: !credential.is_configured(),
            username: credential.username.to_string(),
        })
    }

    async fn setup(
        &self,
        command: SetupCommand,
        client: &ClientContext,
    ) -> Result<AdminStatus, AdminError> {
        let credential = self.store.load().await?;
        let username = command.username.unwrap_or(credential.username);

        if credential.password_hash.is_some() {
            self.record(
                AuditEvent::failure(
                    AuditEventKind::SetupRejected,
                    &username,
                    &client.ip,
                    "already configured",
                ),
                client,
            );
            return Err(AdminError::AlreadyConfigured);
        }

        self.validate_password(&command.password, client)?;

        let password_hash = self.hash_password(command.password).await?;

        match self.store.initialize(username.clone(), password_hash).await {
            Ok(stored) => {
                tracing::info!(username = %stored.username, "Admin account configured");
                self.record(
                    AuditEvent::success(
                        AuditEventKind::SetupCompleted,
                        &stored.username,
                        &client.ip,
                    ),
                    client,
                );
                Ok(AdminStatus {
                    setup_required: false,
                    username: stored.username.to_string(),
                })
            }
            Err(AdminError::AlreadyConfigured) => {
                // Lost a race with a concurrent setup
                self.record(
                    AuditEvent::failure(
                        AuditEventKind::SetupRejected,
                        &username,
                        &client.ip,
                        "already configured",
                    ),
                    client,
                );
                Err(AdminError::AlreadyConfigured)
            }
            Err(e) => Err(e),
        }
    }

    async fn login(
        &self,
        command: LoginCommand,
        client: &ClientContext,
    ) -> Result<Session, AdminError> {
        let credential = self.store.load().await?;

        let Some(stored_hash) = credential.password_hash else {
            self.record(
                AuditEvent::failure(
                    AuditEventKind::LoginFailed,
                    &command.username,
                    &client.ip,
                    "setup required",
                ),
                client,
            );
            return Err(AdminError::SetupRequired);
        };

        // The hash is checked even for a wrong username so both failures
        // cost the same.
        let username_matches = command.username == credential.username.as_str();
        self.begin_credential_check(client)?;
        let password_matches = self.verify_password(command.password, stored_hash).await?;

        if !(username_matches && password_matches) {
            self.log_failed_check(client);
            let reason = if username_matches {
                "wrong password"
            } else {
                "unknown username"
            };
            self.record(
                AuditEvent::failure(
                    AuditEventKind::LoginFailed,
                    &command.username,
                    &client.ip,
                    reason,
                ),
                client,
            );
            return Err(AdminError::InvalidCredentials);
        }

        self.throttle.record_attempt(client.throttle_key(), true);

        let issued = self
            .authenticator
            .generate_token(credential.username.as_str())
            .map_err(|e| AdminError::Unknown(format!("Token generation failed: {}", e)))?;

        tracing::info!(username = %credential.username, ip = %client.ip, "Admin logged in");
        self.record(
            AuditEvent::success(AuditEventKind::LoginSuccess, &credential.username, &client.ip),
            client,
        );

        Ok(Session {
            expires_at: issued.claims.expires_at(),
            username: issued.claims.sub,
            token: issued.access_token,
        })
    }

    fn logout(&self, token: &str, claims: &Claims, client: &ClientContext) {
        self.authenticator.revoke_token(token);

        tracing::info!(username = %claims.sub, "Admin logged out");
        self.record(
            AuditEvent::success(AuditEventKind::Logout, &claims.sub, &client.ip),
            client,
        );
    }

    async fn change_password(
        &self,
        claims: &Claims,
        token: &str,
        command: ChangePasswordCommand,
        client: &ClientContext,
    ) -> Result<(), AdminError> {
        let credential = self.store.load().await?;
        let stored_hash = credential
            .password_hash
            .ok_or(AdminError::SetupRequired)?;

        self.begin_credential_check(client)?;
        let current_matches = self
            .verify_password(command.current_password.clone(), stored_hash)
            .await?;
        if !current_matches {
            self.log_failed_check(client);
            self.record(
                AuditEvent::failure(
                    AuditEventKind::PasswordChangeFailed,
                    &claims.sub,
                    &client.ip,
                    "wrong current password",
                ),
                client,
            );
            return Err(AdminError::InvalidCredentials);
        }
        self.throttle.record_attempt(client.throttle_key(), true);

        let mut errors = self.policy.validate(&command.new_password).errors;
        if command.new_password == command.current_password {
            errors.push("New password must be different from the current password".to_string());
        }
        if !errors.is_empty() {
            self.record(
                AuditEvent::failure(
                    AuditEventKind::PasswordChangeFailed,
                    &claims.sub,
                    &client.ip,
                    errors.join("; "),
                ),
                client,
            );
            return Err(AdminError::WeakPassword(errors));
        }

        let password_hash = self.hash_password(command.new_password).await?;
        self.store.update_password_hash(password_hash).await?;

        self.authenticator.revoke_token(token);

        tracing::info!(username = %claims.sub, "Admin password changed");
        self.record(
            AuditEvent::success(AuditEventKind::PasswordChanged, &claims.sub, &client.ip),
            client,
        );

        Ok(())
    }

    fn validate_password(
        &self,
        password: &str,
        client: &ClientContext,
    ) -> Result<(), AdminError> {
        let report = self.policy.validate(password);
        if report.is_valid {
            return Ok(());
        }

        self.record(
            AuditEvent::failure(
                AuditEventKind::PasswordValidationFailed,
                &client.ip,
                &client.ip,
                report.errors.join("; "),
            ),
            client,
        );
        Err(AdminError::WeakPassword(report.errors))
    }

    fn check_rate_limit(&self, client: &ClientContext) -> Result<(), AdminError> {
        let key = client.throttle_key();
        if !self.throttle.is_limited(key) {
            return Ok(());
        }

        let remaining = self
            .throttle
            .retry_after(key)
            .unwrap_or_else(chrono::Duration::zero);

        Err(self.rate_limited(client, remaining))
    }

    fn authorize(&self, token: &str, client: &ClientContext) -> Result<Claims, AdminError> {
        self.authenticator.validate_token(token).map_err(|e| {
            tracing::info!(ip = %client.ip, reason = %e, "Rejected session token");
            self.record(
                AuditEvent::failure(
                    AuditEventKind::TokenInvalid,
                    UNKNOWN_IDENTIFIER,
                    &client.ip,
                    &e,
                ),
                client,
            );
            AdminError::TokenInvalid
        })
    }

    fn reject_missing_token(&self, client: &ClientContext) -> AdminError {
        self.record(
            AuditEvent::failure(
                AuditEventKind::TokenMissing,
                UNKNOWN_IDENTIFIER,
                &client.ip,
                "no bearer header or session cookie",
            ),
            client,
        );
        AdminError::TokenMissing
    }

    fn purge_expired(&self) -> SweepReport {
        SweepReport {
            login_attempts: self.throttle.purge_expired(),
            revocations: self.authenticator.purge_revocations(),
        }
    }
}
