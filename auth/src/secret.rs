use thiserror::Error;

/// Values shipped in sample configs and tutorials. A server signing with one
/// of these is as good as unauthenticated.
const PLACEHOLDER_SECRETS: &[&str] = &[
    "secret",
    "changeme",
    "change-me",
    "default",
    "jwt-secret",
    "jwt_secret",
    "your-secret-key",
    "your_secret_key",
    "your-jwt-secret",
    "your_jwt_secret",
    "your_jwt_secret_here",
    "your-super-secret-jwt-key",
    "replace-with-a-long-random-secret",
];

/// Error raised when the service is misconfigured at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("JWT signing secret is not set")]
    MissingSecret,

    #[error("JWT signing secret is a known placeholder value")]
    PlaceholderSecret,

    #[error("JWT signing secret must be at least {min} bytes, got {actual}")]
    SecretTooShort { min: usize, actual: usize },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// HMAC signing secret that passed startup validation.
#[derive(Clone)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    /// 256 bits, the HS256 key size.
    pub const MIN_LENGTH: usize = 32;

    /// Validate a configured secret.
    ///
    /// # Errors
    /// * `MissingSecret` - Secret is empty or whitespace
    /// * `PlaceholderSecret` - Secret is a well-known default
    /// * `SecretTooShort` - Secret is shorter than 32 bytes
    pub fn new(secret: &str) -> Result<Self, ConfigurationError> {
        let trimmed = secret.trim();
        if trimmed.is_empty() {
            return Err(ConfigurationError::MissingSecret);
        }

        let lowered = trimmed.to_lowercase();
        if PLACEHOLDER_SECRETS.iter().any(|p| *p == lowered) {
            return Err(ConfigurationError::PlaceholderSecret);
        }

        if trimmed.len() < Self::MIN_LENGTH {
            return Err(ConfigurationError::SecretTooShort {
                min: Self::MIN_LENGTH,
                actual: trimmed.len(),
            });
        }

        Ok(Self(trimmed.as_bytes().to_vec()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningSecret(**redacted**)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_secret_rejected() {
        assert_eq!(SigningSecret::new("").unwrap_err(), ConfigurationError::MissingSecret);
        assert_eq!(SigningSecret::new("   ").unwrap_err(), ConfigurationError::MissingSecret);
    }

    #[test]
    fn test_placeholder_secret_rejected() {
        assert_eq!(
            SigningSecret::new("your-secret-key").unwrap_err(),
            ConfigurationError::PlaceholderSecret
        );
        assert_eq!(
            SigningSecret::new("CHANGEME").unwrap_err(),
            ConfigurationError::PlaceholderSecret
        );
        assert_eq!(
            SigningSecret::new("replace-with-a-long-random-secret").unwrap_err(),
            ConfigurationError::PlaceholderSecret
        );
    }

    #[test]
    fn test_short_secret_rejected() {
        assert_eq!(
            SigningSecret::new("too-short").unwrap_err(),
            ConfigurationError::SecretTooShort { min: 32, actual: 9 }
        );
    }

    #[test]
    fn test_valid_secret_accepted_and_redacted() {
        let secret =
            SigningSecret::new("test-secret-key-for-jwt-signing-at-least-32-bytes").unwrap();

        assert_eq!(secret.as_bytes().len(), 49);
        assert_eq!(format!("{:?}", secret), "SigningSecret(**redacted**)");
    }
}
