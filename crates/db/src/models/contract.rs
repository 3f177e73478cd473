//! Contract entity model, DTOs, and list filter.

use clientele_core::payments;
use clientele_core::types::{DbId, Timestamp};
use serde::Deserialize;
use sqlx::FromRow;
use validator::Validate;

/// Full contract row from the `contracts` table.
///
/// `is_signed` and `is_paid` are independent flags: `is_paid` is never
/// derived from `remaining_amount`, and the update path may set them into
/// disagreement. That looseness is a documented property, not a bug.
#[derive(Debug, Clone, FromRow)]
pub struct Contract {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub client_id: DbId,
    /// The servicing commercial, always the client's commercial at creation.
    pub commercial_id: DbId,
    pub total_amount: f64,
    pub remaining_amount: f64,
    pub is_signed: bool,
    pub is_paid: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Contract {
    /// Whether the full amount has been collected (independent of `is_paid`).
    pub fn is_fully_paid(&self) -> bool {
        payments::is_fully_paid(self.remaining_amount)
    }
}

/// DTO for creating a contract.
///
/// There is no `commercial_id` and no `remaining_amount` here: the first is
/// forced to the client's commercial, the second initializes to
/// `total_amount`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateContract {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub description: Option<String>,
    pub client_id: DbId,
    pub total_amount: f64,
    pub is_signed: bool,
    pub is_paid: bool,
}

/// DTO for updating a contract. Only non-`None` fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateContract {
    pub name: Option<String>,
    pub description: Option<String>,
    pub total_amount: Option<f64>,
    pub remaining_amount: Option<f64>,
    pub is_signed: Option<bool>,
    pub is_paid: Option<bool>,
}

/// Relational filters for contract listings. All optional, combined with AND.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContractFilter {
    pub client_id: Option<DbId>,
    pub commercial_id: Option<DbId>,
    pub is_signed: Option<bool>,
    pub is_paid: Option<bool>,
}
