//! Client portfolio operations.

use clientele_core::error::CoreError;
use clientele_core::permissions::{self, Action, ActorRef, Target};
use clientele_core::roles::Role;
use clientele_core::types::DbId;
use clientele_db::models::client::{Client, CreateClient, UpdateClient};
use clientele_db::repositories::{ClientRepo, UserRepo};
use clientele_db::DbPool;
use validator::Validate;

use crate::error::AppResult;

/// Create a client under the given commercial.
///
/// A commercial may only create clients they own themselves; management
/// and admin may create on behalf of any commercial.
pub async fn create(
    pool: &DbPool,
    actor: Option<&ActorRef>,
    input: CreateClient,
) -> AppResult<Client> {
    // 1. Guard: create permission against the intended owner.
    let actor = permissions::require_authenticated(actor)?;
    permissions::require_allowed(
        actor,
        Action::Create,
        &Target::Client { owning_commercial: input.commercial_id },
    )?;

    // 2. The owner must exist and hold the commercial role.
    let owner_is_commercial = match UserRepo::find_by_id(pool, input.commercial_id).await? {
        Some(user) => user.role()? == Role::Commercial,
        None => false,
    };
    if !owner_is_commercial {
        return Err(CoreError::Validation(format!(
            "User {} does not exist or is not a commercial",
            input.commercial_id
        ))
        .into());
    }

    // 3. Friendly uniqueness precheck (the unique index still backs it).
    if ClientRepo::find_by_email(pool, &input.email).await?.is_some() {
        return Err(CoreError::Conflict(format!(
            "A client with email '{}' already exists",
            input.email
        ))
        .into());
    }

    // 4. Validate and insert.
    input.validate()?;
    let client = ClientRepo::create(pool, &input).await?;
    tracing::info!(client_id = client.id, commercial_id = client.commercial_id, "client created");
    Ok(client)
}

/// Update a client's contact details. Ownership never changes here.
pub async fn update(
    pool: &DbPool,
    actor: Option<&ActorRef>,
    client_id: DbId,
    input: UpdateClient,
) -> AppResult<Client> {
    // 1. Resolve the target and guard against its owner.
    let actor = permissions::require_authenticated(actor)?;
    let client = ClientRepo::find_by_id(pool, client_id)
        .await?
        .ok_or(CoreError::NotFound { entity: "client", id: client_id })?;
    permissions::require_allowed(
        actor,
        Action::Update,
        &Target::Client { owning_commercial: client.commercial_id },
    )?;

    // 2. Changing the email must not collide with another client.
    if let Some(email) = &input.email {
        if let Some(existing) = ClientRepo::find_by_email(pool, email).await? {
            if existing.id != client_id {
                return Err(CoreError::Conflict(format!(
                    "A client with email '{email}' already exists"
                ))
                .into());
            }
        }
    }

    // 3. Apply.
    let client = ClientRepo::update(pool, client_id, &input)
        .await?
        .ok_or(CoreError::NotFound { entity: "client", id: client_id })?;
    tracing::info!(client_id = client.id, "client updated");
    Ok(client)
}

/// Delete a client together with its contracts and their events.
pub async fn delete(pool: &DbPool, actor: Option<&ActorRef>, client_id: DbId) -> AppResult<()> {
    // 1. Resolve the target and guard against its owner.
    let actor = permissions::require_authenticated(actor)?;
    let client = ClientRepo::find_by_id(pool, client_id)
        .await?
        .ok_or(CoreError::NotFound { entity: "client", id: client_id })?;
    permissions::require_allowed(
        actor,
        Action::Delete,
        &Target::Client { owning_commercial: client.commercial_id },
    )?;

    // 2. One atomic cascade: events, then contracts, then the client.
    let deleted = ClientRepo::delete_cascade(pool, client_id).await?;
    if !deleted {
        return Err(CoreError::NotFound { entity: "client", id: client_id }.into());
    }
    Ok(())
}

/// Fetch one client. Reads are open to every authenticated role.
pub async fn get(pool: &DbPool, actor: Option<&ActorRef>, client_id: DbId) -> AppResult<Client> {
    permissions::require_authenticated(actor)?;
    Ok(ClientRepo::find_by_id(pool, client_id)
        .await?
        .ok_or(CoreError::NotFound { entity: "client", id: client_id })?)
}

/// List clients, optionally restricted to one owning commercial.
pub async fn list(
    pool: &DbPool,
    actor: Option<&ActorRef>,
    commercial_id: Option<DbId>,
) -> AppResult<Vec<Client>> {
    permissions::require_authenticated(actor)?;
    Ok(ClientRepo::list(pool, commercial_id).await?)
}
