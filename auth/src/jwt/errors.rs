use thiserror::Error;

/// Error type for JWT operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Failed to decode token: {0}")]
    DecodingFailed(String),

    #[error("Token is expired")]
    TokenExpired,

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token issuer does not match")]
    InvalidIssuer,

    #[error("Token audience does not match")]
    InvalidAudience,

    #[error("Token type is not accepted: {0}")]
    InvalidTokenType(String),

    #[error("Token has been revoked")]
    Revoked,
}
