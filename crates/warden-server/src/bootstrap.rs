//! Seeding of the initial super-admin account.

use tracing::info;
use warden_auth::password::PasswordSecurity;
use warden_core::error::WardenResult;
use warden_core::models::role::AccessRole;
use warden_core::models::user::{CreateUser, User};
use warden_core::repository::UserRepository;

use crate::config::BootstrapUser;

/// Create the configured super-admin in `repo`.
pub async fn seed_super_admin<U: UserRepository>(
    repo: &U,
    security: &PasswordSecurity,
    seed: &BootstrapUser,
) -> WardenResult<User> {
    let password_hash = security.hash(&seed.password)?;
    let user = repo
        .create(CreateUser {
            first_name: "Super".into(),
            last_name: "Admin".into(),
            username: seed.username.clone(),
            email: seed.email.clone(),
            password_hash,
            role: AccessRole::SuperAdmin,
            company_id: seed.company_id,
            location_id: seed.location_id,
            active: true,
        })
        .await?;

    info!(user_id = user.id, username = %user.username, "bootstrap super-admin created");
    Ok(user)
}
