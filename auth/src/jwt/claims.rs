use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// Token type carried by every session token.
pub const ACCESS_TOKEN_TYPE: &str = "access";

/// Session token claims.
///
/// Standard RFC 7519 claims plus a `typ` marker. `jti` keeps two tokens
/// issued within the same second distinct.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (admin username)
    pub sub: String,

    /// Token type
    pub typ: String,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// JWT ID (unique token identifier)
    pub jti: String,
}

impl Claims {
    /// Create access token claims for a user, valid from `now` for `ttl`.
    ///
    /// # Arguments
    /// * `username` - Subject of the token
    /// * `issuer` - Issuing service name
    /// * `audience` - Intended consumer of the token
    /// * `now` - Issue instant
    /// * `ttl` - Lifetime of the token
    pub fn for_user(
        username: impl ToString,
        issuer: impl ToString,
        audience: impl ToString,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            sub: username.to_string(),
            typ: ACCESS_TOKEN_TYPE.to_string(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Username the token was issued to.
    pub fn username(&self) -> &str {
        &self.sub
    }

    /// Expiration as a UTC instant.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Check if token is expired.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_user() {
        let now = Utc::now();
        let claims = Claims::for_user(
            "admin",
            "blog-api",
            "blog-admin",
            now,
            Duration::hours(24),
        );

        assert_eq!(claims.username(), "admin");
        assert_eq!(claims.typ, ACCESS_TOKEN_TYPE);
        assert_eq!(claims.iss, "blog-api");
        assert_eq!(claims.aud, "blog-admin");
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
        assert_eq!(claims.expires_at().timestamp(), claims.exp);
    }

    #[test]
    fn test_jti_is_unique() {
        let now = Utc::now();
        let first = Claims::for_user("admin", "iss", "aud", now, Duration::hours(1));
        let second = Claims::for_user("admin", "iss", "aud", now, Duration::hours(1));

        assert_ne!(first.jti, second.jti);
    }

    #[test]
    fn test_is_expired() {
        let mut claims = Claims::for_user("admin", "iss", "aud", Utc::now(), Duration::hours(1));
        claims.exp = 1000;

        assert!(!claims.is_expired(999)); // Not expired
        assert!(!claims.is_expired(1000)); // Exactly at expiration
        assert!(claims.is_expired(1001)); // Expired
    }
}
