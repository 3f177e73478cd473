//! Client entity model and DTOs.

use clientele_core::types::{DbId, Timestamp};
use serde::Deserialize;
use sqlx::FromRow;
use validator::Validate;

/// Full client row from the `clients` table.
///
/// A client is owned by exactly one commercial (`commercial_id`); its
/// contracts and, transitively, their events live and die with it.
#[derive(Debug, Clone, FromRow)]
pub struct Client {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub company_name: Option<String>,
    pub commercial_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Client {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// DTO for creating a new client.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateClient {
    #[validate(length(min = 1, max = 64))]
    pub first_name: String,
    #[validate(length(min = 1, max = 64))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 20))]
    pub phone: String,
    pub company_name: Option<String>,
    /// The owning commercial; must exist and hold the commercial role.
    pub commercial_id: DbId,
}

/// DTO for updating a client. Only non-`None` fields are applied.
///
/// `commercial_id` is deliberately absent: ownership is permanent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateClient {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company_name: Option<String>,
}
