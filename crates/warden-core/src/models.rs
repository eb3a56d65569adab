//! Domain models for Warden.
//!
//! These are the core types shared across all crates.

pub mod principal;
pub mod role;
pub mod user;
