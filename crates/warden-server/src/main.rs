//! Warden server: application entry point.

mod bootstrap;
mod cli;
mod config;
mod logging;

use anyhow::Context;
use clap::Parser;
use warden_auth::password::PasswordSecurity;
use warden_auth::service::AuthService;
use warden_db::InMemoryUserRepository;

use crate::cli::Cli;
use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_format);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting warden");

    let config = ServerConfig::load(&cli.config).context("failed to load configuration")?;

    let repo = InMemoryUserRepository::new();
    let security =
        PasswordSecurity::from_config(&config.auth).context("invalid password settings")?;
    let service = AuthService::new(repo.clone(), &config.auth)
        .context("invalid token signing configuration")?;

    if let Some(seed) = &config.bootstrap {
        bootstrap::seed_super_admin(&repo, &security, seed)
            .await
            .context("failed to seed bootstrap account")?;
    }

    tracing::info!(
        algorithm = ?service.codec().algorithm(),
        access_token_lifetime_secs = service.codec().lifetime().num_seconds(),
        users = repo.count().await,
        "warden ready"
    );

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;

    tracing::info!("warden stopped");
    Ok(())
}
