//! User entity model and DTOs.

use std::str::FromStr;

use clientele_core::error::CoreError;
use clientele_core::permissions::ActorRef;
use clientele_core::roles::Role;
use clientele_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Full user row from the `users` table.
///
/// Contains the password hash -- never include this in rendered output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    /// Stored role name; parse with [`User::role`].
    pub role: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Parse the stored role name into the closed [`Role`] enumeration.
    pub fn role(&self) -> Result<Role, CoreError> {
        Role::from_str(&self.role)
    }

    /// The actor view of this user, used for permission checks.
    pub fn actor_ref(&self) -> Result<ActorRef, CoreError> {
        Ok(ActorRef { id: self.id, role: self.role()? })
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Safe user representation for rendered output (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub role: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            full_name: user.full_name(),
            role: user.role.clone(),
        }
    }
}

/// DTO for inserting a new user. The password is already hashed.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUser {
    #[validate(length(min = 1, max = 64))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    pub password_hash: String,
    #[validate(length(min = 1, max = 64))]
    pub first_name: String,
    #[validate(length(min = 1, max = 64))]
    pub last_name: String,
    /// Canonical role name (validated against [`Role`] by the caller).
    pub role: String,
}

/// DTO for updating an existing user. Only non-`None` fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<String>,
}
