//! Role-based access control over the five access tiers.
//!
//! Every check is a pure function of the caller and a target: no I/O, no
//! shared state. A denial is always [`AuthError::Forbidden`] and nothing
//! more, so callers cannot learn which rule failed.

use tracing::debug;
use warden_core::models::principal::{ListScope, Principal};
use warden_core::models::role::AccessRole;

use crate::error::AuthError;

fn check(allowed: bool, principal: &Principal, rule: &'static str) -> Result<(), AuthError> {
    if allowed {
        Ok(())
    } else {
        debug!(principal_id = principal.id, rule, "authorization denied");
        Err(AuthError::Forbidden)
    }
}

fn is_admin(principal: &Principal) -> bool {
    principal.role <= AccessRole::Admin
}

fn is_company_admin(principal: &Principal) -> bool {
    principal.role <= AccessRole::CompanyAdmin
}

/// The caller's tier is `required` or more privileged.
pub fn enforce_role(principal: &Principal, required: AccessRole) -> Result<(), AuthError> {
    check(principal.role <= required, principal, "role")
}

/// Admins may act on any user; everyone else only on themselves.
pub fn enforce_user(principal: &Principal, user_id: u64) -> Result<(), AuthError> {
    check(
        is_admin(principal) || principal.id == user_id,
        principal,
        "user",
    )
}

/// Admins may act on any company; company admins only on their own.
pub fn enforce_company(principal: &Principal, company_id: u64) -> Result<(), AuthError> {
    if is_admin(principal) {
        return Ok(());
    }
    enforce_role(principal, AccessRole::CompanyAdmin)?;
    check(principal.company_id == company_id, principal, "company")
}

/// Company admins and above may act on any location; location admins only
/// on their own.
pub fn enforce_location(principal: &Principal, location_id: u64) -> Result<(), AuthError> {
    if is_company_admin(principal) {
        return Ok(());
    }
    enforce_role(principal, AccessRole::LocationAdmin)?;
    check(principal.location_id == location_id, principal, "location")
}

/// The caller is strictly more privileged than `role`.
///
/// Guards account creation and deletion against privilege escalation.
pub fn is_lower_role(principal: &Principal, role: AccessRole) -> Result<(), AuthError> {
    check(principal.role < role, principal, "lower_role")
}

/// Provisioning a user with `role` in the given company/location.
///
/// The caller must control the location and may only hand out tiers below
/// their own.
pub fn account_create(
    principal: &Principal,
    role: AccessRole,
    _company_id: u64,
    location_id: u64,
) -> Result<(), AuthError> {
    enforce_location(principal, location_id)?;
    is_lower_role(principal, role)
}

/// Which users the caller may list.
pub fn list_scope(principal: &Principal) -> Result<ListScope, AuthError> {
    match principal.role {
        AccessRole::SuperAdmin | AccessRole::Admin => Ok(ListScope::All),
        AccessRole::CompanyAdmin => Ok(ListScope::Company(principal.company_id)),
        AccessRole::LocationAdmin => Ok(ListScope::Location(principal.location_id)),
        AccessRole::User => {
            debug!(principal_id = principal.id, rule = "list", "authorization denied");
            Err(AuthError::Forbidden)
        }
    }
}
