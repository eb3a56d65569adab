//! Authentication configuration.

use std::fmt;

use serde::Deserialize;

/// Configuration for the authentication service.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Shared secret used to sign and verify access tokens.
    pub jwt_secret: String,
    /// JWS algorithm name (`HS256`, `HS384` or `HS512`).
    pub jwt_algorithm: String,
    /// Access token lifetime in seconds (default: 900 = 15 minutes).
    pub access_token_lifetime_secs: u64,
    /// Minimum password length for policy enforcement.
    pub min_password_length: usize,
    /// Argon2id time cost (iterations) used when hashing passwords.
    pub password_hash_cost: u32,
    /// Store a SHA-256 digest of the access token as the refresh value
    /// instead of the access token itself.
    pub hash_refresh_tokens: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            jwt_algorithm: "HS256".into(),
            access_token_lifetime_secs: 900,
            min_password_length: 8,
            password_hash_cost: 2,
            hash_refresh_tokens: true,
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("jwt_algorithm", &self.jwt_algorithm)
            .field("access_token_lifetime_secs", &self.access_token_lifetime_secs)
            .field("min_password_length", &self.min_password_length)
            .field("password_hash_cost", &self.password_hash_cost)
            .field("hash_refresh_tokens", &self.hash_refresh_tokens)
            .finish()
    }
}
