//! Repository for the `events` table.

use clientele_core::types::DbId;

use crate::models::event::{CreateEvent, Event, EventFilter, UpdateEvent};
use crate::DbPool;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, contract_id, client_id, support_id, start_at, end_at, \
                       location, attendees, notes, created_at, updated_at";

/// Provides CRUD operations for events.
pub struct EventRepo;

impl EventRepo {
    /// Insert a new event, returning the created row.
    pub async fn create(pool: &DbPool, input: &CreateEvent) -> Result<Event, sqlx::Error> {
        let query = format!(
            "INSERT INTO events
                (name, contract_id, client_id, start_at, end_at, location, attendees, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(&input.name)
            .bind(input.contract_id)
            .bind(input.client_id)
            .bind(input.start_at)
            .bind(input.end_at)
            .bind(&input.location)
            .bind(input.attendees)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// Find an event by internal ID.
    pub async fn find_by_id(pool: &DbPool, id: DbId) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events WHERE id = $1");
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List events matching the filter.
    ///
    /// Relational criteria run in SQL; the temporal-status criterion is a
    /// pure post-filter over each row's computed status.
    pub async fn list(pool: &DbPool, filter: &EventFilter) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM events
             WHERE ($1 IS NULL OR support_id = $1)
               AND (NOT $2 OR support_id IS NULL)
               AND ($3 IS NULL OR contract_id IN
                    (SELECT id FROM contracts WHERE commercial_id = $3))
             ORDER BY start_at"
        );
        let events = sqlx::query_as::<_, Event>(&query)
            .bind(filter.support_id)
            .bind(filter.unassigned)
            .bind(filter.commercial_id)
            .fetch_all(pool)
            .await?;

        Ok(match filter.status {
            Some(status) => events.into_iter().filter(|e| e.status() == status).collect(),
            None => events,
        })
    }

    /// Update an event. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &DbPool,
        id: DbId,
        input: &UpdateEvent,
    ) -> Result<Option<Event>, sqlx::Error> {
        let query = format!(
            "UPDATE events SET
                name = COALESCE($2, name),
                start_at = COALESCE($3, start_at),
                end_at = COALESCE($4, end_at),
                location = COALESCE($5, location),
                attendees = COALESCE($6, attendees),
                notes = COALESCE($7, notes),
                updated_at = CURRENT_TIMESTAMP
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.start_at)
            .bind(input.end_at)
            .bind(&input.location)
            .bind(input.attendees)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// Assign a support member to an event.
    ///
    /// The role check on the support user happens in the operation layer;
    /// this only records the link. Returns `None` if the event is missing.
    pub async fn assign_support(
        pool: &DbPool,
        id: DbId,
        support_id: DbId,
    ) -> Result<Option<Event>, sqlx::Error> {
        let query = format!(
            "UPDATE events SET support_id = $2, updated_at = CURRENT_TIMESTAMP
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(support_id)
            .fetch_optional(pool)
            .await
    }
}
