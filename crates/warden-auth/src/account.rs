//! Account management: the RBAC-gated user flows built on top of the
//! auth primitives.
//!
//! Every operation takes the caller's [`Principal`] and runs the matching
//! RBAC check before touching the store.

use serde::Deserialize;
use tracing::{info, instrument};
use warden_core::error::WardenResult;
use warden_core::models::principal::Principal;
use warden_core::models::role::AccessRole;
use warden_core::models::user::{CreateUser, UpdateUser, User};
use warden_core::repository::{PaginatedResult, Pagination, UserRepository};

use crate::error::AuthError;
use crate::password::PasswordSecurity;
use crate::rbac;

/// Input for provisioning a new account.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: AccessRole,
    pub company_id: u64,
    pub location_id: u64,
}

pub struct AccountService<U: UserRepository> {
    user_repo: U,
    security: PasswordSecurity,
}

/// Terms a password must not contain for this person.
fn personal_terms<'a>(
    first_name: &'a str,
    last_name: &'a str,
    username: &'a str,
    email: &'a str,
) -> [&'a str; 4] {
    let local_part = email.split('@').next().unwrap_or(email);
    [first_name, last_name, username, local_part]
}

impl<U: UserRepository> AccountService<U> {
    pub fn new(user_repo: U, security: PasswordSecurity) -> Self {
        Self {
            user_repo,
            security,
        }
    }

    /// Change a user's password after checking the old one.
    #[instrument(skip(self, principal, old_password, new_password), fields(caller = principal.id))]
    pub async fn change_password(
        &self,
        principal: &Principal,
        user_id: u64,
        old_password: &str,
        new_password: &str,
    ) -> WardenResult<()> {
        rbac::enforce_user(principal, user_id)?;

        let mut user = self.user_repo.get_by_id(user_id).await?;

        if !self
            .security
            .hash_matches_password(&user.password_hash, old_password)
        {
            return Err(AuthError::IncorrectPassword.into());
        }

        let terms = personal_terms(
            &user.first_name,
            &user.last_name,
            &user.username,
            &user.email,
        );
        if !self.security.password(new_password, &terms) {
            return Err(AuthError::InsecurePassword.into());
        }

        user.change_password(self.security.hash(new_password)?);
        self.user_repo.update(&user).await?;

        info!("password changed");
        Ok(())
    }

    /// Provision a new, active account.
    #[instrument(skip(self, principal, input), fields(caller = principal.id, username = %input.username))]
    pub async fn create(&self, principal: &Principal, input: NewAccount) -> WardenResult<User> {
        rbac::account_create(principal, input.role, input.company_id, input.location_id)?;

        let terms = personal_terms(
            &input.first_name,
            &input.last_name,
            &input.username,
            &input.email,
        );
        if !self.security.password(&input.password, &terms) {
            return Err(AuthError::InsecurePassword.into());
        }

        let password_hash = self.security.hash(&input.password)?;
        let user = self
            .user_repo
            .create(CreateUser {
                first_name: input.first_name,
                last_name: input.last_name,
                username: input.username,
                email: input.email,
                password_hash,
                role: input.role,
                company_id: input.company_id,
                location_id: input.location_id,
                active: true,
            })
            .await?;

        info!(user_id = user.id, role = %user.role, "account created");
        Ok(user)
    }

    /// Users visible to the caller.
    pub async fn list(
        &self,
        principal: &Principal,
        pagination: Pagination,
    ) -> WardenResult<PaginatedResult<User>> {
        let scope = rbac::list_scope(principal)?;
        self.user_repo.list(scope, pagination).await
    }

    pub async fn view(&self, principal: &Principal, user_id: u64) -> WardenResult<User> {
        rbac::enforce_user(principal, user_id)?;
        self.user_repo.get_by_id(user_id).await
    }

    /// Update a user's contact information.
    pub async fn update(
        &self,
        principal: &Principal,
        user_id: u64,
        update: UpdateUser,
    ) -> WardenResult<User> {
        rbac::enforce_user(principal, user_id)?;

        let mut user = self.user_repo.get_by_id(user_id).await?;
        user.apply(update);
        self.user_repo.update(&user).await?;
        Ok(user)
    }

    /// Delete a user of a strictly lower tier than the caller.
    #[instrument(skip(self, principal), fields(caller = principal.id))]
    pub async fn delete(&self, principal: &Principal, user_id: u64) -> WardenResult<()> {
        let user = self.user_repo.get_by_id(user_id).await?;
        rbac::is_lower_role(principal, user.role)?;
        self.user_repo.delete(user.id).await?;

        info!("account deleted");
        Ok(())
    }
}
