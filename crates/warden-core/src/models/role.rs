//! Access tiers.
//!
//! A role is a single point on a totally ordered scale where a lower
//! numeric level means more privilege. Every authorization decision is a
//! comparison between two tiers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::WardenError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
#[repr(u16)]
pub enum AccessRole {
    /// Has all permissions.
    SuperAdmin = 100,
    /// Has admin specific permissions.
    Admin = 110,
    /// Can manage everything inside one company.
    CompanyAdmin = 120,
    /// Can manage everything inside one location.
    LocationAdmin = 130,
    /// Standard user.
    User = 200,
}

impl AccessRole {
    pub const ALL: [AccessRole; 5] = [
        AccessRole::SuperAdmin,
        AccessRole::Admin,
        AccessRole::CompanyAdmin,
        AccessRole::LocationAdmin,
        AccessRole::User,
    ];

    /// Numeric access level.
    pub const fn level(self) -> u16 {
        self as u16
    }

    pub const fn name(self) -> &'static str {
        match self {
            AccessRole::SuperAdmin => "SUPER_ADMIN",
            AccessRole::Admin => "ADMIN",
            AccessRole::CompanyAdmin => "COMPANY_ADMIN",
            AccessRole::LocationAdmin => "LOCATION_ADMIN",
            AccessRole::User => "USER",
        }
    }
}

impl TryFrom<u16> for AccessRole {
    type Error = WardenError;

    fn try_from(level: u16) -> Result<Self, Self::Error> {
        match level {
            100 => Ok(AccessRole::SuperAdmin),
            110 => Ok(AccessRole::Admin),
            120 => Ok(AccessRole::CompanyAdmin),
            130 => Ok(AccessRole::LocationAdmin),
            200 => Ok(AccessRole::User),
            other => Err(WardenError::Validation {
                message: format!("unknown access role: {other}"),
            }),
        }
    }
}

impl From<AccessRole> for u16 {
    fn from(role: AccessRole) -> Self {
        role.level()
    }
}

impl fmt::Display for AccessRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_follows_numeric_level() {
        for a in AccessRole::ALL {
            for b in AccessRole::ALL {
                assert_eq!(a < b, a.level() < b.level(), "{a} vs {b}");
            }
        }
        assert!(AccessRole::SuperAdmin < AccessRole::User);
    }

    #[test]
    fn only_five_tiers_convert() {
        for role in AccessRole::ALL {
            assert_eq!(AccessRole::try_from(role.level()).unwrap(), role);
        }
        for bogus in [0u16, 99, 101, 140, 400, 500] {
            assert!(AccessRole::try_from(bogus).is_err(), "{bogus} accepted");
        }
    }

    #[test]
    fn serializes_as_integer() {
        let json = serde_json::to_string(&AccessRole::CompanyAdmin).unwrap();
        assert_eq!(json, "120");

        let role: AccessRole = serde_json::from_str("130").unwrap();
        assert_eq!(role, AccessRole::LocationAdmin);

        assert!(serde_json::from_str::<AccessRole>("150").is_err());
    }
}
