//! Event operations.
//!
//! Events exist only under signed contracts. Dates arrive as text in the
//! `YYYY-MM-DD HH:MM` format and are parsed before any permission check or
//! write. `client_id` on the row is denormalized from the contract.

use clientele_core::error::CoreError;
use clientele_core::permissions::{self, Action, ActorRef, Target};
use clientele_core::roles::Role;
use clientele_core::status;
use clientele_core::types::DbId;
use clientele_db::models::event::{CreateEvent, Event, EventFilter, UpdateEvent};
use clientele_db::repositories::{ContractRepo, EventRepo, UserRepo};
use clientele_db::DbPool;
use validator::Validate;

use crate::error::AppResult;

/// Input for creating an event, with textual dates.
#[derive(Debug, Clone)]
pub struct CreateEventInput {
    pub name: String,
    pub contract_id: DbId,
    pub start_date: String,
    pub end_date: String,
    pub location: String,
    pub attendees: i64,
    pub notes: Option<String>,
}

/// Input for updating an event. Only `Some` fields apply.
#[derive(Debug, Clone, Default)]
pub struct UpdateEventInput {
    pub name: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub location: Option<String>,
    pub attendees: Option<i64>,
    pub notes: Option<String>,
}

/// The permission view of an event, resolved through its contract.
async fn event_target(pool: &DbPool, event: &Event) -> AppResult<Target> {
    let contract = ContractRepo::find_by_id(pool, event.contract_id)
        .await?
        .ok_or(CoreError::NotFound { entity: "contract", id: event.contract_id })?;
    Ok(Target::Event {
        contract_commercial: contract.commercial_id,
        assigned_support: event.support_id,
    })
}

/// Create an event under a signed contract.
pub async fn create(
    pool: &DbPool,
    actor: Option<&ActorRef>,
    input: CreateEventInput,
) -> AppResult<Event> {
    // 1. Parse and validate the interval before touching the database.
    let actor = permissions::require_authenticated(actor)?;
    let start_at = status::parse_event_date(&input.start_date)?;
    let end_at = status::parse_event_date(&input.end_date)?;
    status::validate_interval(start_at, end_at)?;

    // 2. Guard: create permission through the contract's commercial. The
    //    permission check runs before any look at the contract's state.
    let contract = ContractRepo::find_by_id(pool, input.contract_id)
        .await?
        .ok_or(CoreError::NotFound { entity: "contract", id: input.contract_id })?;
    permissions::require_allowed(
        actor,
        Action::Create,
        &Target::Event { contract_commercial: contract.commercial_id, assigned_support: None },
    )?;

    // 3. Events exist only under signed contracts.
    if !contract.is_signed {
        return Err(CoreError::Validation(
            "The contract must be signed before an event can be created".into(),
        )
        .into());
    }

    // 4. Insert with the client denormalized from the contract.
    let create = CreateEvent {
        name: input.name,
        contract_id: contract.id,
        client_id: contract.client_id,
        start_at,
        end_at,
        location: input.location,
        attendees: input.attendees,
        notes: input.notes,
    };
    create.validate()?;

    let event = EventRepo::create(pool, &create).await?;
    tracing::info!(event_id = event.id, contract_id = event.contract_id, "event created");
    Ok(event)
}

/// Update an event's details.
pub async fn update(
    pool: &DbPool,
    actor: Option<&ActorRef>,
    event_id: DbId,
    input: UpdateEventInput,
) -> AppResult<Event> {
    // 1. Resolve the target and guard through its contract.
    let actor = permissions::require_authenticated(actor)?;
    let event = EventRepo::find_by_id(pool, event_id)
        .await?
        .ok_or(CoreError::NotFound { entity: "event", id: event_id })?;
    let target = event_target(pool, &event).await?;
    permissions::require_allowed(actor, Action::Update, &target)?;

    // 2. Parse any incoming dates and validate the merged interval.
    let start_at = match &input.start_date {
        Some(text) => Some(status::parse_event_date(text)?),
        None => None,
    };
    let end_at = match &input.end_date {
        Some(text) => Some(status::parse_event_date(text)?),
        None => None,
    };
    status::validate_interval(
        start_at.unwrap_or(event.start_at),
        end_at.unwrap_or(event.end_at),
    )?;

    if let Some(attendees) = input.attendees {
        if attendees < 0 {
            return Err(
                CoreError::Validation("The attendee count cannot be negative".into()).into(),
            );
        }
    }

    // 3. Apply.
    let update = UpdateEvent {
        name: input.name,
        start_at,
        end_at,
        location: input.location,
        attendees: input.attendees,
        notes: input.notes,
    };
    let event = EventRepo::update(pool, event_id, &update)
        .await?
        .ok_or(CoreError::NotFound { entity: "event", id: event_id })?;
    tracing::info!(event_id = event.id, "event updated");
    Ok(event)
}

/// Assign a support member to an event.
pub async fn assign_support(
    pool: &DbPool,
    actor: Option<&ActorRef>,
    event_id: DbId,
    support_id: DbId,
) -> AppResult<Event> {
    // 1. Resolve the target and guard through its contract.
    let actor = permissions::require_authenticated(actor)?;
    let event = EventRepo::find_by_id(pool, event_id)
        .await?
        .ok_or(CoreError::NotFound { entity: "event", id: event_id })?;
    let target = event_target(pool, &event).await?;
    permissions::require_allowed(actor, Action::Update, &target)?;

    // 2. The assignee must exist and hold the support role.
    let assignee_is_support = match UserRepo::find_by_id(pool, support_id).await? {
        Some(user) => user.role()? == Role::Support,
        None => false,
    };
    if !assignee_is_support {
        return Err(CoreError::Validation(format!(
            "User {support_id} does not exist or is not a support member"
        ))
        .into());
    }

    // 3. Record the assignment.
    let event = EventRepo::assign_support(pool, event_id, support_id)
        .await?
        .ok_or(CoreError::NotFound { entity: "event", id: event_id })?;
    tracing::info!(event_id = event.id, support_id, "support assigned to event");
    Ok(event)
}

/// Fetch one event. Reads are open to every authenticated role.
pub async fn get(pool: &DbPool, actor: Option<&ActorRef>, event_id: DbId) -> AppResult<Event> {
    permissions::require_authenticated(actor)?;
    Ok(EventRepo::find_by_id(pool, event_id)
        .await?
        .ok_or(CoreError::NotFound { entity: "event", id: event_id })?)
}

/// List events matching the filter.
pub async fn list(
    pool: &DbPool,
    actor: Option<&ActorRef>,
    filter: EventFilter,
) -> AppResult<Vec<Event>> {
    permissions::require_authenticated(actor)?;
    Ok(EventRepo::list(pool, &filter).await?)
}
