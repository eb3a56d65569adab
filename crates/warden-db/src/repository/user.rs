//! In-memory implementation of [`UserRepository`].
//!
//! Rows live in a `BTreeMap` behind a single async `RwLock`, so every
//! write, including a full-row `update`, is atomic and the last writer
//! wins.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use warden_core::error::WardenResult;
use warden_core::models::principal::ListScope;
use warden_core::models::user::{CreateUser, User};
use warden_core::repository::{PaginatedResult, Pagination, UserRepository};

use crate::error::DbError;

#[derive(Debug, Default)]
struct UserTable {
    last_id: u64,
    rows: BTreeMap<u64, User>,
}

impl UserTable {
    fn find(&self, pred: impl Fn(&User) -> bool) -> Option<&User> {
        self.rows.values().find(|u| pred(u))
    }
}

fn in_scope(user: &User, scope: ListScope) -> bool {
    match scope {
        ListScope::All => true,
        ListScope::Company(id) => user.company_id == id,
        ListScope::Location(id) => user.location_id == id,
    }
}

/// In-memory user store.
///
/// Cloning yields another handle onto the same table.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    table: Arc<RwLock<UserTable>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub async fn count(&self) -> usize {
        self.table.read().await.rows.len()
    }
}

impl UserRepository for InMemoryUserRepository {
    async fn create(&self, input: CreateUser) -> WardenResult<User> {
        let mut table = self.table.write().await;

        if table.find(|u| u.username == input.username).is_some() {
            return Err(DbError::Duplicate {
                entity: "user".into(),
                key: format!("username={}", input.username),
            }
            .into());
        }

        table.last_id += 1;
        let now = Utc::now();
        let user = User {
            id: table.last_id,
            first_name: input.first_name,
            last_name: input.last_name,
            username: input.username,
            email: input.email,
            password_hash: input.password_hash,
            mobile: None,
            phone: None,
            address: None,
            active: input.active,
            last_login: None,
            last_password_change: None,
            token: None,
            role: input.role,
            company_id: input.company_id,
            location_id: input.location_id,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(user.id, user.clone());

        debug!(user_id = user.id, "user row created");
        Ok(user)
    }

    async fn get_by_id(&self, id: u64) -> WardenResult<User> {
        let table = self.table.read().await;
        table.rows.get(&id).cloned().ok_or_else(|| {
            DbError::NotFound {
                entity: "user".into(),
                id: id.to_string(),
            }
            .into()
        })
    }

    async fn get_by_username(&self, username: &str) -> WardenResult<User> {
        let table = self.table.read().await;
        table
            .find(|u| u.username == username)
            .cloned()
            .ok_or_else(|| {
                DbError::NotFound {
                    entity: "user".into(),
                    id: format!("username={username}"),
                }
                .into()
            })
    }

    async fn get_by_refresh_token(&self, token: &str) -> WardenResult<User> {
        let table = self.table.read().await;
        table
            .find(|u| u.token.as_deref() == Some(token))
            .cloned()
            .ok_or_else(|| {
                // The token itself never goes into an error.
                DbError::NotFound {
                    entity: "user".into(),
                    id: "refresh_token".into(),
                }
                .into()
            })
    }

    async fn update(&self, user: &User) -> WardenResult<()> {
        let mut table = self.table.write().await;
        match table.rows.get_mut(&user.id) {
            Some(row) => {
                *row = user.clone();
                Ok(())
            }
            None => Err(DbError::NotFound {
                entity: "user".into(),
                id: user.id.to_string(),
            }
            .into()),
        }
    }

    async fn delete(&self, id: u64) -> WardenResult<()> {
        let mut table = self.table.write().await;
        table.rows.remove(&id).map(|_| ()).ok_or_else(|| {
            DbError::NotFound {
                entity: "user".into(),
                id: id.to_string(),
            }
            .into()
        })
    }

    async fn list(
        &self,
        scope: ListScope,
        pagination: Pagination,
    ) -> WardenResult<PaginatedResult<User>> {
        let table = self.table.read().await;
        let matching: Vec<&User> = table.rows.values().filter(|u| in_scope(u, scope)).collect();

        let items = matching
            .iter()
            .skip(pagination.offset as usize)
            .take(pagination.limit as usize)
            .map(|u| (*u).clone())
            .collect();

        Ok(PaginatedResult {
            items,
            total: matching.len() as u64,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
