//! Authentication utilities library
//!
//! Provides the session-security building blocks for the blog admin API:
//! - Password hashing (Argon2id) and password policy
//! - JWT token generation and validation
//! - Token revocation and login throttling
//! - Audit events
//! - Authentication coordination
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! ```
//!
//! ## Password Policy
//! ```
//! use auth::PasswordPolicy;
//!
//! let report = PasswordPolicy::new().validate("admin123");
//! assert!(!report.is_valid);
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, SigningSecret, TokenSettings};
//!
//! let secret = SigningSecret::new("secret_key_at_least_32_bytes_long!").unwrap();
//! let auth = Authenticator::new(&secret, TokenSettings::default());
//!
//! // Setup: hash password
//! let hash = auth.hash_password("Secur3!Pass").unwrap();
//!
//! // Login: verify and generate token
//! let result = auth.authenticate("Secur3!Pass", &hash, "admin").unwrap();
//!
//! // Validate token
//! let claims = auth.validate_token(&result.access_token).unwrap();
//! assert_eq!(claims.username(), "admin");
//!
//! // Logout
//! auth.revoke_token(&result.access_token);
//! assert!(auth.validate_token(&result.access_token).is_err());
//! ```

pub mod audit;
pub mod authenticator;
pub mod jwt;
pub mod password;
pub mod revocation;
pub mod secret;
pub mod throttle;

// Re-export commonly used items
pub use audit::AuditEvent;
pub use audit::AuditEventKind;
pub use audit::AuditSink;
pub use audit::TracingAuditSink;
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use authenticator::TokenSettings;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::HashingCost;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use password::PasswordPolicy;
pub use password::PasswordReport;
pub use revocation::RevocationList;
pub use secret::ConfigurationError;
pub use secret::SigningSecret;
pub use throttle::LoginThrottle;
