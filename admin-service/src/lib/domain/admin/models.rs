use std::fmt;

use chrono::DateTime;
use chrono::Utc;

use crate::domain::admin::errors::UsernameError;

/// The single admin credential.
///
/// `password_hash` stays `None` until setup, which is how the service knows
/// setup is still required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub username: Username,
    pub password_hash: Option<String>,
}

impl Credential {
    /// Credential awaiting setup.
    pub fn unconfigured(username: Username) -> Self {
        Self {
            username,
            password_hash: None,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.password_hash.is_some()
    }
}

/// Username value type
///
/// Ensures username is 3-32 characters and contains only alphanumeric, underscore, and hyphen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 32;

    /// Create a new valid username.
    ///
    /// # Errors
    /// * `TooShort` - Username shorter than 3 characters
    /// * `TooLong` - Username longer than 32 characters
    /// * `InvalidCharacters` - Contains non-alphanumeric characters (except _ and -)
    pub fn new(username: String) -> Result<Self, UsernameError> {
        let username = Self::with_valid_length(username)?;
        let username = Self::with_valid_chars(username)?;
        Ok(Self(username))
    }

    fn with_valid_length(username: String) -> Result<String, UsernameError> {
        let length = username.chars().count();
        if length < Self::MIN_LENGTH {
            Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(username)
        }
    }

    fn with_valid_chars(username: String) -> Result<String, UsernameError> {
        if username
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
        {
            Ok(username)
        } else {
            Err(UsernameError::InvalidCharacters)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Who is calling, as far as the transport can tell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientContext {
    pub ip: String,
    pub user_agent: Option<String>,
}

impl ClientContext {
    pub const UNKNOWN_IP: &'static str = "unknown";

    pub fn new(ip: impl ToString, user_agent: Option<String>) -> Self {
        Self {
            ip: ip.to_string(),
            user_agent,
        }
    }

    /// Identifier the login throttle counts against.
    pub fn throttle_key(&self) -> &str {
        &self.ip
    }
}

/// Command to configure the admin password for the first time.
#[derive(Debug)]
pub struct SetupCommand {
    /// Replaces the configured default username when present.
    pub username: Option<Username>,
    pub password: String,
}

/// Command to exchange credentials for a session token.
#[derive(Debug)]
pub struct LoginCommand {
    pub username: String,
    pub password: String,
}

/// Command to replace the admin password.
#[derive(Debug)]
pub struct ChangePasswordCommand {
    pub current_password: String,
    pub new_password: String,
}

/// Whether the admin account still needs setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminStatus {
    pub setup_required: bool,
    pub username: String,
}

/// A freshly issued session.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

/// Entries removed by one sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SweepReport {
    pub login_attempts: usize,
    pub revocations: usize,
}
