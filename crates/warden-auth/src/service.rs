//! Authentication service: login, refresh and "who am I".

use serde::Serialize;
use tracing::{info, instrument, warn};
use warden_core::error::{WardenError, WardenResult};
use warden_core::models::principal::Principal;
use warden_core::models::user::User;
use warden_core::repository::UserRepository;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password::PasswordSecurity;
use crate::token::TokenCodec;

/// Successful login result.
#[derive(Debug, Clone, Serialize)]
pub struct AuthToken {
    /// Signed JWT access token.
    pub token: String,
    /// Access token expiry (RFC 3339).
    pub expires: String,
    /// Opaque refresh value, also stored on the user.
    pub refresh_token: String,
}

/// Successful refresh result.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshToken {
    /// New signed JWT access token.
    pub token: String,
    /// Access token expiry (RFC 3339).
    pub expires: String,
}

/// Authentication service.
///
/// Generic over the user store so that the auth layer has no dependency
/// on any storage crate.
pub struct AuthService<U: UserRepository> {
    user_repo: U,
    codec: TokenCodec,
    security: PasswordSecurity,
}

impl<U: UserRepository> AuthService<U> {
    /// Build the service from configuration.
    ///
    /// Fails on an unusable signing algorithm, secret or hash cost, so a
    /// misconfigured process never starts serving.
    pub fn new(user_repo: U, config: &AuthConfig) -> Result<Self, AuthError> {
        Ok(Self::with_parts(
            user_repo,
            TokenCodec::from_config(config)?,
            PasswordSecurity::from_config(config)?,
        ))
    }

    pub fn with_parts(user_repo: U, codec: TokenCodec, security: PasswordSecurity) -> Self {
        Self {
            user_repo,
            codec,
            security,
        }
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Authenticate a user with username + password and issue tokens.
    ///
    /// An unknown username and a wrong password produce the same error.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, username: &str, password: &str) -> WardenResult<AuthToken> {
        // 1. Look up user.
        let mut user = match self.user_repo.get_by_username(username).await {
            Ok(u) => u,
            Err(WardenError::NotFound { .. }) => {
                info!("login rejected");
                return Err(AuthError::InvalidCredentials.into());
            }
            Err(e) => return Err(e),
        };

        // 2. Verify password.
        if !self
            .security
            .hash_matches_password(&user.password_hash, password)
        {
            info!("login rejected");
            return Err(AuthError::InvalidCredentials.into());
        }

        // 3. Check account status.
        if !user.active {
            warn!(user_id = user.id, "login attempt on inactive account");
            return Err(AuthError::AccountInactive.into());
        }

        // 4. Issue JWT access token.
        let issued = self.codec.generate_token(&user)?;

        // 5. Derive and persist the refresh value; this replaces any
        //    previous one.
        let refresh_token = self.security.token(&issued.token);
        user.update_last_login(refresh_token.clone());
        self.user_repo.update(&user).await?;

        info!(user_id = user.id, "user authenticated");
        Ok(AuthToken {
            expires: issued.expires(),
            token: issued.token,
            refresh_token,
        })
    }

    /// Issue a new access token for the holder of a refresh value.
    ///
    /// The refresh value itself is not rotated and stays valid until the
    /// next login.
    #[instrument(skip_all)]
    pub async fn refresh(&self, refresh_token: &str) -> WardenResult<RefreshToken> {
        if refresh_token.is_empty() {
            return Err(AuthError::RefreshTokenInvalid.into());
        }

        let user = match self.user_repo.get_by_refresh_token(refresh_token).await {
            Ok(u) => u,
            Err(WardenError::NotFound { .. }) => {
                info!("refresh rejected");
                return Err(AuthError::RefreshTokenInvalid.into());
            }
            Err(e) => return Err(e),
        };

        let issued = self.codec.generate_token(&user)?;

        info!(user_id = user.id, "access token refreshed");
        Ok(RefreshToken {
            expires: issued.expires(),
            token: issued.token,
        })
    }

    /// The caller's own user record.
    #[instrument(skip_all, fields(user_id = principal.id))]
    pub async fn me(&self, principal: &Principal) -> WardenResult<User> {
        self.user_repo.get_by_id(principal.id).await
    }

    /// Validate an `Authorization` header value and return the caller.
    ///
    /// Stateless; no store lookup is performed.
    pub fn validate(&self, authorization: &str) -> WardenResult<Principal> {
        self.codec
            .parse_and_validate(authorization)
            .map_err(WardenError::from)
    }
}
