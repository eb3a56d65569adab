//! Password hashing and verification using Argon2id, the password
//! policy gate, and refresh value derivation.

use std::fmt;
use std::sync::Arc;

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use sha2::{Digest, Sha256};

use crate::config::AuthConfig;
use crate::error::AuthError;

/// Argon2id memory cost in KiB (19 MiB, OWASP recommendation).
const MEMORY_COST_KIB: u32 = 19_456;

/// Digest applied to a freshly issued access token to derive the refresh
/// value stored on the user.
pub trait TokenDigest: Send + Sync {
    fn digest(&self, seed: &str) -> String;
}

/// SHA-256, hex-encoded.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Digest;

impl TokenDigest for Sha256Digest {
    fn digest(&self, seed: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(seed.as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// Password and secret handling primitives.
///
/// Nothing here performs I/O, and no secret ever ends up in an error
/// message or log line.
#[derive(Clone)]
pub struct PasswordSecurity {
    argon2: Argon2<'static>,
    min_length: usize,
    token_digest: Option<Arc<dyn TokenDigest>>,
}

impl PasswordSecurity {
    /// `cost` is the Argon2id time cost. Memory is fixed at 19 MiB with a
    /// single lane.
    pub fn new(
        min_length: usize,
        cost: u32,
        token_digest: Option<Arc<dyn TokenDigest>>,
    ) -> Result<Self, AuthError> {
        let params = argon2::Params::new(MEMORY_COST_KIB, cost, 1, None)
            .map_err(|e| AuthError::Config(format!("argon2 params: {e}")))?;
        let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

        Ok(Self {
            argon2,
            min_length,
            token_digest,
        })
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self, AuthError> {
        let digest: Option<Arc<dyn TokenDigest>> = if config.hash_refresh_tokens {
            Some(Arc::new(Sha256Digest))
        } else {
            None
        };
        Self::new(config.min_password_length, config.password_hash_cost, digest)
    }

    /// Hash a password into an Argon2id PHC string with a fresh salt.
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut argon2::password_hash::rand_core::OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::Crypto(format!("password hash error: {e}")))
    }

    /// Check `candidate` against a stored PHC hash.
    ///
    /// A malformed hash simply does not match.
    pub fn hash_matches_password(&self, hash: &str, candidate: &str) -> bool {
        let Ok(parsed) = argon2::PasswordHash::new(hash) else {
            return false;
        };
        self.argon2
            .verify_password(candidate.as_bytes(), &parsed)
            .is_ok()
    }

    /// Policy gate applied before hashing a new password.
    ///
    /// Rejects candidates shorter than the minimum length and candidates
    /// that contain any of `excluded` (names, username, email), ignoring
    /// case.
    pub fn password(&self, candidate: &str, excluded: &[&str]) -> bool {
        if candidate.chars().count() < self.min_length {
            return false;
        }
        let lowered = candidate.to_lowercase();
        !excluded
            .iter()
            .map(|term| term.trim().to_lowercase())
            .filter(|term| !term.is_empty())
            .any(|term| lowered.contains(&term))
    }

    /// Derive the opaque refresh value from an access token.
    ///
    /// Returns the seed unchanged when no digest is configured.
    pub fn token(&self, seed: &str) -> String {
        match &self.token_digest {
            Some(digest) => digest.digest(seed),
            None => seed.to_string(),
        }
    }
}

impl fmt::Debug for PasswordSecurity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordSecurity")
            .field("min_length", &self.min_length)
            .field("token_digest", &self.token_digest.is_some())
            .finish()
    }
}
