//! Event entity model, DTOs, and list filter.

use clientele_core::status::{self, EventStatus};
use clientele_core::types::{DbId, Timestamp};
use serde::Deserialize;
use sqlx::FromRow;
use validator::Validate;

/// Full event row from the `events` table.
///
/// `client_id` denormalizes the contract's client so listings do not need a
/// join. `support_id` is the optionally assigned support member.
#[derive(Debug, Clone, FromRow)]
pub struct Event {
    pub id: DbId,
    pub name: String,
    pub contract_id: DbId,
    pub client_id: DbId,
    pub support_id: Option<DbId>,
    pub start_at: Timestamp,
    pub end_at: Timestamp,
    pub location: String,
    pub attendees: i64,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Event {
    /// Computed temporal status at the current time. Never persisted.
    pub fn status(&self) -> EventStatus {
        status::status_at(self.start_at, self.end_at, chrono::Utc::now())
    }

    pub fn has_support(&self) -> bool {
        self.support_id.is_some()
    }

    pub fn duration_hours(&self) -> f64 {
        status::duration_hours(self.start_at, self.end_at)
    }
}

/// DTO for creating an event. The interval is already parsed and validated;
/// `client_id` comes from the contract, not the caller.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEvent {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub contract_id: DbId,
    pub client_id: DbId,
    pub start_at: Timestamp,
    pub end_at: Timestamp,
    #[validate(length(min = 1, max = 200))]
    pub location: String,
    #[validate(range(min = 0))]
    pub attendees: i64,
    pub notes: Option<String>,
}

/// DTO for updating an event. Only non-`None` fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEvent {
    pub name: Option<String>,
    pub start_at: Option<Timestamp>,
    pub end_at: Option<Timestamp>,
    pub location: Option<String>,
    pub attendees: Option<i64>,
    pub notes: Option<String>,
}

/// Filters for event listings.
///
/// Relational filters (`support_id`, `unassigned`, `commercial_id`) are
/// applied in SQL; `status` is a pure post-filter over the computed temporal
/// status, never a persisted flag.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventFilter {
    pub support_id: Option<DbId>,
    /// Only events with no assigned support.
    pub unassigned: bool,
    /// Only events whose contract is serviced by this commercial.
    pub commercial_id: Option<DbId>,
    pub status: Option<EventStatus>,
}
