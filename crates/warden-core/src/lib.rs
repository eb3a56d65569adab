//! Warden Core: shared error type, domain models and the user store
//! contract.

pub mod error;
pub mod models;
pub mod repository;

pub use error::{WardenError, WardenResult};
pub use models::principal::{ListScope, Principal};
pub use models::role::AccessRole;
pub use models::user::{CreateUser, UpdateUser, User};
