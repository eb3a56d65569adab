//! Server configuration file loading.
//!
//! The file is YAML and must be named after one of the known environments
//! (`conf.development.yaml`, `conf.testing.yaml`, `conf.staging.yaml` or
//! `conf.production.yaml`). Selected `auth` values can be overridden from
//! the process environment.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};
use warden_auth::config::AuthConfig;

const EXPECTED_FILES: [&str; 4] = [
    "conf.development.yaml",
    "conf.testing.yaml",
    "conf.staging.yaml",
    "conf.production.yaml",
];

pub const ENV_JWT_SECRET: &str = "WARDEN_JWT_SECRET";
pub const ENV_JWT_ALGORITHM: &str = "WARDEN_JWT_ALGORITHM";
pub const ENV_JWT_LIFETIME_SECS: &str = "WARDEN_JWT_LIFETIME_SECS";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unrecognized config file name: {0}")]
    UnexpectedFileName(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid value for {var}: {message}")]
    InvalidEnvVar { var: &'static str, message: String },
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub auth: AuthConfig,
    /// Super-admin account seeded into an empty store at startup.
    pub bootstrap: Option<BootstrapUser>,
}

#[derive(Clone, Deserialize)]
pub struct BootstrapUser {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default = "default_scope_id")]
    pub company_id: u64,
    #[serde(default = "default_scope_id")]
    pub location_id: u64,
}

fn default_scope_id() -> u64 {
    1
}

impl std::fmt::Debug for BootstrapUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapUser")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("company_id", &self.company_id)
            .field("location_id", &self.location_id)
            .finish()
    }
}

/// Reject paths whose file name is not one of the environment files.
fn check_file_name(path: &Path) -> Result<(), ConfigError> {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    if EXPECTED_FILES.contains(&name) {
        Ok(())
    } else {
        Err(ConfigError::UnexpectedFileName(path.to_path_buf()))
    }
}

impl ServerConfig {
    /// Load from `path` and apply environment overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        check_file_name(path)?;
        info!(path = %path.display(), "loading configuration");

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: ServerConfig =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        config.apply_env_overrides(|var| std::env::var(var).ok())?;
        debug!(auth = ?config.auth, "configuration loaded");
        Ok(config)
    }

    /// Override `auth` values from `lookup`, normally the process
    /// environment.
    pub fn apply_env_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(secret) = lookup(ENV_JWT_SECRET) {
            self.auth.jwt_secret = secret;
        }
        if let Some(algorithm) = lookup(ENV_JWT_ALGORITHM) {
            self.auth.jwt_algorithm = algorithm;
        }
        if let Some(lifetime) = lookup(ENV_JWT_LIFETIME_SECS) {
            self.auth.access_token_lifetime_secs =
                lifetime
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidEnvVar {
                        var: ENV_JWT_LIFETIME_SECS,
                        message: "expected a whole number of seconds".into(),
                    })?;
        }
        Ok(())
    }
}
