//! Authentication and authorization error types.

use thiserror::Error;
use warden_core::error::WardenError;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown username or wrong password; the two are never told apart.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("account is inactive")]
    AccountInactive,

    #[error("authorization header is missing")]
    TokenMissing,

    #[error("authorization header is not a bearer token")]
    TokenMalformed,

    #[error("token has expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    TokenInvalid(String),

    #[error("invalid refresh token")]
    RefreshTokenInvalid,

    #[error("forbidden")]
    Forbidden,

    #[error("incorrect old password")]
    IncorrectPassword,

    #[error("insecure password")]
    InsecurePassword,

    #[error("cryptography error: {0}")]
    Crypto(String),

    #[error("invalid auth configuration: {0}")]
    Config(String),
}

impl From<AuthError> for WardenError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials
            | AuthError::AccountInactive
            | AuthError::TokenMissing
            | AuthError::TokenMalformed
            | AuthError::TokenExpired
            | AuthError::TokenInvalid(_)
            | AuthError::RefreshTokenInvalid => WardenError::AuthenticationFailed {
                reason: err.to_string(),
            },
            AuthError::Forbidden => WardenError::AuthorizationDenied,
            AuthError::IncorrectPassword | AuthError::InsecurePassword => {
                WardenError::Validation {
                    message: err.to_string(),
                }
            }
            AuthError::Crypto(msg) => WardenError::Crypto(msg),
            AuthError::Config(msg) => WardenError::Config(msg),
        }
    }
}
