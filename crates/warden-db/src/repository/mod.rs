//! User store implementations.

mod user;

pub use user::InMemoryUserRepository;
