//! Authenticated caller identity and list scoping.

use serde::{Deserialize, Serialize};

use super::role::AccessRole;

/// The identity carried by a validated access token.
///
/// Rebuilt for every request and passed by reference to whatever needs to
/// make an authorization decision. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub role: AccessRole,
    pub company_id: u64,
    pub location_id: u64,
}

/// Row filter a caller is restricted to when listing users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListScope {
    /// No restriction.
    All,
    /// Only rows with this company id.
    Company(u64),
    /// Only rows with this location id.
    Location(u64),
}
