//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Implementations must make a
//! single-row `update` atomic; nothing in Warden needs more than that.

use crate::error::WardenResult;
use crate::models::principal::ListScope;
use crate::models::user::{CreateUser, User};

/// Pagination parameters for list queries.
#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

/// The user store.
///
/// Lookups that find nothing return [`WardenError::NotFound`].
///
/// [`WardenError::NotFound`]: crate::error::WardenError::NotFound
pub trait UserRepository: Send + Sync {
    fn create(&self, input: CreateUser) -> impl Future<Output = WardenResult<User>> + Send;
    fn get_by_id(&self, id: u64) -> impl Future<Output = WardenResult<User>> + Send;
    fn get_by_username(&self, username: &str)
    -> impl Future<Output = WardenResult<User>> + Send;
    fn get_by_refresh_token(
        &self,
        token: &str,
    ) -> impl Future<Output = WardenResult<User>> + Send;
    /// Replace the stored row for `user.id` with `user`.
    fn update(&self, user: &User) -> impl Future<Output = WardenResult<()>> + Send;
    fn delete(&self, id: u64) -> impl Future<Output = WardenResult<()>> + Send;
    fn list(
        &self,
        scope: ListScope,
        pagination: Pagination,
    ) -> impl Future<Output = WardenResult<PaginatedResult<User>>> + Send;
}
