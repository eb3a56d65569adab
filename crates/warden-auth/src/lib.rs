//! Warden Auth: password handling, JWT issuance/validation, tiered RBAC,
//! and the login/refresh and account flows built on them.

pub mod account;
pub mod config;
pub mod error;
pub mod password;
pub mod rbac;
pub mod service;
pub mod token;

pub use account::{AccountService, NewAccount};
pub use config::AuthConfig;
pub use error::AuthError;
pub use password::{PasswordSecurity, Sha256Digest, TokenDigest};
pub use service::{AuthService, AuthToken, RefreshToken};
pub use token::{AccessTokenClaims, IssuedToken, TokenCodec};
