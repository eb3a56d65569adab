//! User domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::role::AccessRole;

/// A user account as held by the user store.
///
/// Besides contact data this is the credential record: the password hash
/// and the opaque refresh value live here and are never serialized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub last_password_change: Option<DateTime<Utc>>,
    /// Opaque refresh value issued at the last login.
    #[serde(skip)]
    pub token: Option<String>,
    pub role: AccessRole,
    pub company_id: u64,
    pub location_id: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Replace the password hash and stamp the change.
    pub fn change_password(&mut self, hash: String) {
        let now = Utc::now();
        self.password_hash = hash;
        self.last_password_change = Some(now);
        self.updated_at = now;
    }

    /// Store a freshly issued refresh value and stamp the login.
    pub fn update_last_login(&mut self, token: String) {
        let now = Utc::now();
        self.token = Some(token);
        self.last_login = Some(now);
        self.updated_at = now;
    }

    /// Merge the contact fields present in `update`.
    pub fn apply(&mut self, update: UpdateUser) {
        let UpdateUser {
            first_name,
            last_name,
            mobile,
            phone,
            address,
        } = update;

        if let Some(v) = first_name {
            self.first_name = v;
        }
        if let Some(v) = last_name {
            self.last_name = v;
        }
        if let Some(v) = mobile {
            self.mobile = Some(v);
        }
        if let Some(v) = phone {
            self.phone = Some(v);
        }
        if let Some(v) = address {
            self.address = Some(v);
        }
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    /// Already hashed; stores never see plaintext passwords.
    pub password_hash: String,
    pub role: AccessRole,
    pub company_id: u64,
    pub location_id: u64,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateUser {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub mobile: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}
