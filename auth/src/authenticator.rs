use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::revocation::RevocationList;
use crate::secret::SigningSecret;

/// Claims every issued token is bound to.
#[derive(Debug, Clone)]
pub struct TokenSettings {
    pub issuer: String,
    pub audience: String,
    pub ttl: Duration,
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self {
            issuer: "blog-api".to_string(),
            audience: "blog-admin".to_string(),
            ttl: Duration::hours(24),
        }
    }
}

/// Authentication coordinator combining password verification, JWT
/// generation and revocation.
///
/// A token moves from issued to valid and ends either expired or revoked;
/// neither end state is reversible.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
    revocations: RevocationList,
    ttl: Duration,
}

/// Result of successful authentication.
#[derive(Debug, Clone)]
pub struct AuthenticationResult {
    /// JWT access token
    pub access_token: String,
    /// Claims encoded in the token
    pub claims: Claims,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// Only a validated [`SigningSecret`] is accepted, so a missing or
    /// placeholder secret fails at startup rather than on first request.
    pub fn new(secret: &SigningSecret, settings: TokenSettings) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            jwt_handler: JwtHandler::new(secret.as_bytes(), settings.issuer, settings.audience),
            revocations: RevocationList::new(),
            ttl: settings.ttl,
        }
    }

    pub fn with_password_hasher(mut self, password_hasher: PasswordHasher) -> Self {
        self.password_hasher = password_hasher;
        self
    }

    pub fn with_revocation_list(mut self, revocations: RevocationList) -> Self {
        self.revocations = revocations;
        self
    }

    pub fn token_ttl(&self) -> Duration {
        self.ttl
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a password against a stored hash; false on mismatch or a
    /// malformed hash.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> bool {
        self.password_hasher.verify(password, stored_hash)
    }

    /// Verify credentials and generate a JWT token.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `username` - Subject of the issued token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        username: &str,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        if !self.password_hasher.verify(password, stored_hash) {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(self.generate_token(username)?)
    }

    /// Generate a JWT token without password verification.
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn generate_token(&self, username: &str) -> Result<AuthenticationResult, JwtError> {
        self.generate_token_at(username, Utc::now())
    }

    pub fn generate_token_at(
        &self,
        username: &str,
        now: DateTime<Utc>,
    ) -> Result<AuthenticationResult, JwtError> {
        let claims = Claims::for_user(
            username,
            self.jwt_handler.issuer(),
            self.jwt_handler.audience(),
            now,
            self.ttl,
        );
        let access_token = self.jwt_handler.encode(&claims)?;

        Ok(AuthenticationResult {
            access_token,
            claims,
        })
    }

    /// Validate and decode a JWT token.
    ///
    /// The revocation list is consulted before any cryptographic work, so a
    /// known-bad token is rejected cheaply.
    ///
    /// # Errors
    /// * `Revoked` - Token was explicitly invalidated
    /// * any other `JwtError` - Signature, expiry, issuer, audience or type
    ///   check failed
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        if self.revocations.is_revoked(token) {
            return Err(JwtError::Revoked);
        }

        self.jwt_handler.decode(token)
    }

    /// Revoke a token until it would have expired on its own.
    ///
    /// Tokens whose expiry cannot be read are tracked for a full TTL.
    pub fn revoke_token(&self, token: &str) {
        let expires_at = self
            .jwt_handler
            .decode_unverified(token)
            .map(|claims| claims.exp)
            .unwrap_or_else(|_| (Utc::now() + self.ttl).timestamp());

        self.revocations.revoke(token, expires_at);
    }

    pub fn is_revoked(&self, token: &str) -> bool {
        self.revocations.is_revoked(token)
    }

    /// Drop revocations for tokens that have expired anyway.
    pub fn purge_revocations(&self) -> usize {
        self.revocations.purge_expired()
    }

    pub fn revoked_count(&self) -> usize {
        self.revocations.len()
    }
}
