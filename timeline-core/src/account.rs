//! Accounts and their outward representation
//!
//! An account is the record the credential guard authenticates against. The core account
//! struct is defined as follows:
//!
//! | Field                   | Type               | Description                                         |
//! | ----------------------- | ------------------ | --------------------------------------------------- |
//! | `id`                    | `AccountId`        | Store-assigned identifier.                          |
//! | `full_name`             | `String`           | Display name.                                       |
//! | `email`                 | `String`           | Unique login key.                                   |
//! | `password_hash`         | `String`           | PHC hash string. Never leaves the process.          |
//! | `role`                  | `Role`             | Authorization role.                                 |
//! | `email_confirmed`       | `bool`             | Whether the email address has been confirmed.       |
//! | `failed_login_attempts` | `u32`              | Consecutive failed sign-ins.                        |
//! | `lock_until`            | `Option<DateTime>` | Sign-in is refused while this lies in the future.   |
//! | `last_login`            | `Option<DateTime>` | Most recent successful sign-in.                     |
//! | `avatar_url`            | `Option<String>`   | Avatar image URL.                                   |
//! | `created_at`            | `DateTime`         | Creation timestamp.                                 |
//! | `updated_at`            | `DateTime`         | Last modification timestamp.                        |
use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use crate::id::AccountId;
use crate::error::ValidationError;

/// Authorization role carried by accounts and session tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[default]
    User,
    Manager,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Manager => "MANAGER",
            Role::Admin => "ADMIN",
        }
    }

    /// Parse a client supplied role, falling back to the base role when the
    /// value is absent or not a member of the enumeration.
    pub fn parse_or_default(role: Option<&str>) -> Self {
        role.and_then(|r| r.parse().ok()).unwrap_or_default()
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Role::User),
            "MANAGER" => Ok(Role::Manager),
            "ADMIN" => Ok(Role::Admin),
            other => Err(ValidationError::InvalidField(format!("Unknown role: {other}"))),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone)]
pub struct Account {
    pub id: AccountId,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub email_confirmed: bool,
    pub failed_login_attempts: u32,
    pub lock_until: Option<DateTime<Utc>>,
    pub last_login: Option<DateTime<Utc>>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Outward representation without the password hash.
    pub fn view(&self) -> AccountView {
        AccountView::from(self)
    }

    /// Overwrite the profile fields present in `update`.
    ///
    /// Credential and lockout state are not reachable through this path.
    pub fn apply(&mut self, update: AccountUpdate) {
        if let Some(full_name) = update.full_name {
            self.full_name = full_name;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(role) = update.role {
            self.role = role;
        }
        if let Some(email_confirmed) = update.email_confirmed {
            self.email_confirmed = email_confirmed;
        }
        if let Some(avatar_url) = update.avatar_url {
            self.avatar_url = Some(avatar_url);
        }
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("role", &self.role)
            .field("email_confirmed", &self.email_confirmed)
            .field("failed_login_attempts", &self.failed_login_attempts)
            .field("lock_until", &self.lock_until)
            .field("last_login", &self.last_login)
            .field("avatar_url", &self.avatar_url)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Data needed to insert an account. The store assigns `id` and timestamps.
#[derive(Clone)]
pub struct NewAccount {
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub email_confirmed: bool,
}

impl NewAccount {
    pub fn new(full_name: String, email: String, password_hash: String, role: Role) -> Self {
        Self {
            full_name,
            email,
            password_hash,
            role,
            email_confirmed: false,
        }
    }
}

/// Partial profile update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct AccountUpdate {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub email_confirmed: Option<bool>,
    pub avatar_url: Option<String>,
}

/// Sanitized account view returned to clients.
///
/// Carries the identifier twice, natively as `id` and as a string in `_id`,
/// for consumers expecting either form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub id: AccountId,
    #[serde(rename = "_id")]
    pub id_string: String,
    pub full_name: String,
    pub email: String,
    pub email_confirmed: bool,
    pub role: Role,
    pub failed_login_attempts: u32,
    pub last_login: Option<DateTime<Utc>>,
    pub lock_until: Option<DateTime<Utc>>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            id_string: account.id.to_string(),
            full_name: account.full_name.clone(),
            email: account.email.clone(),
            email_confirmed: account.email_confirmed,
            role: account.role,
            failed_login_attempts: account.failed_login_attempts,
            last_login: account.last_login,
            lock_until: account.lock_until,
            avatar_url: account.avatar_url.clone(),
            created_at: account.created_at,
        }
    }
}

impl From<Account> for AccountView {
    fn from(account: Account) -> Self {
        AccountView::from(&account)
    }
}
