use thiserror::Error;

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Username too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error(
        "Username contains invalid characters (only alphanumeric, underscore, and hyphen allowed)"
    )]
    InvalidCharacters,
}

/// Top-level error for all admin authentication operations.
///
/// Messages are safe to show to clients: none of them reveals whether a
/// username exists or which credential check failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AdminError {
    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    #[error("Password does not meet requirements")]
    WeakPassword(Vec<String>),

    #[error("Admin account is already configured")]
    AlreadyConfigured,

    #[error("Admin account has not been set up yet")]
    SetupRequired,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Too many login attempts, try again in {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication token is missing")]
    TokenMissing,

    #[error("Authentication token is invalid or expired")]
    TokenInvalid,

    // Infrastructure errors
    #[error("Credential store error: {0}")]
    Storage(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}
