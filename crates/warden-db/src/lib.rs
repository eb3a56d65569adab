//! Warden Database: user store implementations.
//!
//! This crate provides:
//! - An in-memory user store ([`InMemoryUserRepository`]) used by the
//!   server binary and by tests
//! - Error types ([`DbError`])

mod error;
pub mod repository;

pub use error::DbError;
pub use repository::InMemoryUserRepository;
