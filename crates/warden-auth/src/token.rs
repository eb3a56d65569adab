//! JWT access token issuance and validation.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use warden_core::models::principal::Principal;
use warden_core::models::role::AccessRole;
use warden_core::models::user::User;

use crate::config::AuthConfig;
use crate::error::AuthError;

const BEARER: &str = "Bearer";

/// JWT claims embedded in every access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// User ID.
    pub id: u64,
    pub username: String,
    pub email: String,
    /// Access tier; tokens carrying anything but a known tier are rejected.
    pub role: AccessRole,
    #[serde(rename = "companyId")]
    pub company_id: u64,
    #[serde(rename = "locationId")]
    pub location_id: u64,
    /// Issued-at (Unix timestamp).
    pub iat: i64,
    /// Expiration (Unix timestamp).
    pub exp: i64,
    /// Unique token ID.
    pub jti: String,
}

impl From<AccessTokenClaims> for Principal {
    fn from(claims: AccessTokenClaims) -> Self {
        Principal {
            id: claims.id,
            username: claims.username,
            email: claims.email,
            role: claims.role,
            company_id: claims.company_id,
            location_id: claims.location_id,
        }
    }
}

/// A freshly signed access token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Compact JWS.
    pub token: String,
    /// Absolute expiry.
    pub expires_at: DateTime<Utc>,
}

impl IssuedToken {
    /// Expiry as an RFC 3339 UTC instant, seconds precision.
    pub fn expires(&self) -> String {
        self.expires_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

/// Issues and validates HMAC-signed access tokens.
#[derive(Clone)]
pub struct TokenCodec {
    algorithm: Algorithm,
    lifetime: TimeDelta,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    /// Build a codec for `algorithm`.
    ///
    /// Only the shared-secret algorithms can be driven by a secret, so
    /// anything other than `HS256`, `HS384` or `HS512` is refused here
    /// rather than failing on the first request.
    pub fn new(secret: &str, algorithm: &str, lifetime: Duration) -> Result<Self, AuthError> {
        let algorithm = match algorithm {
            "HS256" => Algorithm::HS256,
            "HS384" => Algorithm::HS384,
            "HS512" => Algorithm::HS512,
            other => {
                return Err(AuthError::Config(format!(
                    "unsupported signing algorithm: {other}"
                )));
            }
        };
        if secret.is_empty() {
            return Err(AuthError::Config("JWT secret is not configured".into()));
        }
        if secret.len() < 32 {
            tracing::warn!("JWT secret is shorter than recommended (32 bytes)");
        }
        let lifetime = TimeDelta::from_std(lifetime)
            .map_err(|e| AuthError::Config(format!("token lifetime out of range: {e}")))?;
        if Utc::now().checked_add_signed(lifetime).is_none() {
            return Err(AuthError::Config(
                "token lifetime out of range: expiry is not representable".into(),
            ));
        }

        // Expiry is absolute: no clock-skew allowance.
        let mut validation = Validation::new(algorithm);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            algorithm,
            lifetime,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self, AuthError> {
        Self::new(
            &config.jwt_secret,
            &config.jwt_algorithm,
            Duration::from_secs(config.access_token_lifetime_secs),
        )
    }

    /// Sign a new access token for `user`, valid for the configured
    /// lifetime from now.
    pub fn generate_token(&self, user: &User) -> Result<IssuedToken, AuthError> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.lifetime)
            .ok_or_else(|| AuthError::Crypto("token expiry overflows the calendar".into()))?;
        let claims = AccessTokenClaims {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
            company_id: user.company_id,
            location_id: user.location_id,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = self.encode(&claims)?;
        Ok(IssuedToken {
            token,
            expires_at: DateTime::from_timestamp(claims.exp, 0).unwrap_or(expires_at),
        })
    }

    /// Validate the value of an `Authorization` header (`Bearer <token>`)
    /// and return the caller it identifies.
    pub fn parse_and_validate(&self, authorization: &str) -> Result<Principal, AuthError> {
        if authorization.is_empty() {
            return Err(AuthError::TokenMissing);
        }
        match authorization.split_once(' ') {
            Some((BEARER, token)) if !token.is_empty() => self.validate(token),
            _ => Err(AuthError::TokenMalformed),
        }
    }

    /// Validate a bare token (signature, algorithm, expiry).
    pub fn validate(&self, token: &str) -> Result<Principal, AuthError> {
        self.decode(token).map(Principal::from)
    }

    /// Decode and verify a token, returning its raw claims.
    pub fn decode(&self, token: &str) -> Result<AccessTokenClaims, AuthError> {
        jsonwebtoken::decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::TokenInvalid(e.to_string()),
            })
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Configured access token lifetime.
    pub fn lifetime(&self) -> TimeDelta {
        self.lifetime
    }

    fn encode(&self, claims: &AccessTokenClaims) -> Result<String, AuthError> {
        jsonwebtoken::encode(&Header::new(self.algorithm), claims, &self.encoding_key)
            .map_err(|e| AuthError::Crypto(format!("JWT encode: {e}")))
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &self.algorithm)
            .field("lifetime_secs", &self.lifetime.num_seconds())
            .finish()
    }
}
