use async_trait::async_trait;
use auth::Claims;

use crate::domain::admin::errors::AdminError;
use crate::domain::admin::models::AdminStatus;
use crate::domain::admin::models::ChangePasswordCommand;
use crate::domain::admin::models::ClientContext;
use crate::domain::admin::models::Credential;
use crate::domain::admin::models::LoginCommand;
use crate::domain::admin::models::Session;
use crate::domain::admin::models::SetupCommand;
use crate::domain::admin::models::SweepReport;
use crate::domain::admin::models::Username;

/// Port for admin authentication operations.
#[async_trait]
pub trait AdminServicePort: Send + Sync + 'static {
    /// Report whether setup is still required.
    ///
    /// # Errors
    /// * `Storage` - Credential could not be read
    async fn status(&self) -> Result<AdminStatus, AdminError>;

    /// Configure the admin password. Succeeds at most once.
    ///
    /// # Errors
    /// * `AlreadyConfigured` - A password hash is already stored
    /// * `WeakPassword` - Password violates the policy
    async fn setup(
        &self,
        command: SetupCommand,
        client: &ClientContext,
    ) -> Result<AdminStatus, AdminError>;

    /// Exchange credentials for a session token.
    ///
    /// # Errors
    /// * `SetupRequired` - No password has been configured
    /// * `InvalidCredentials` - Username or password is wrong
    async fn login(
        &self,
        command: LoginCommand,
        client: &ClientContext,
    ) -> Result<Session, AdminError>;

    /// Revoke the token presented with the request.
    fn logout(&self, token: &str, claims: &Claims, client: &ClientContext);

    /// Replace the admin password after re-checking the current one.
    /// The presenting token is revoked on success.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Current password is wrong
    /// * `WeakPassword` - New password violates the policy or equals the old one
    async fn change_password(
        &self,
        claims: &Claims,
        token: &str,
        command: ChangePasswordCommand,
        client: &ClientContext,
    ) -> Result<(), AdminError>;

    /// Gate for endpoints that accept a new password.
    ///
    /// # Errors
    /// * `WeakPassword` - Every violated rule, itemised
    fn validate_password(&self, password: &str, client: &ClientContext)
        -> Result<(), AdminError>;

    /// Gate for endpoints that check credentials.
    ///
    /// # Errors
    /// * `RateLimited` - Client exhausted its failed attempts
    fn check_rate_limit(&self, client: &ClientContext) -> Result<(), AdminError>;

    /// Verify a presented token.
    ///
    /// # Errors
    /// * `TokenInvalid` - Token is revoked, expired, forged or malformed
    fn authorize(&self, token: &str, client: &ClientContext) -> Result<Claims, AdminError>;

    /// Record a request that carried no token and return the matching error.
    fn reject_missing_token(&self, client: &ClientContext) -> AdminError;

    /// Remove expired throttle records and revocations.
    fn purge_expired(&self) -> SweepReport;
}

/// Persistence operations for the admin credential.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Read the current credential.
    ///
    /// # Errors
    /// * `Storage` - Backend failure
    async fn load(&self) -> Result<Credential, AdminError>;

    /// Store username and hash if no hash is set yet, atomically.
    ///
    /// # Errors
    /// * `AlreadyConfigured` - A hash was already present
    /// * `Storage` - Backend failure
    async fn initialize(
        &self,
        username: Username,
        password_hash: String,
    ) -> Result<Credential, AdminError>;

    /// Replace the stored hash.
    ///
    /// # Errors
    /// * `SetupRequired` - No hash has been set yet
    /// * `Storage` - Backend failure
    async fn update_password_hash(&self, password_hash: String) -> Result<(), AdminError>;
}
