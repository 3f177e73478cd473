//! Collaborator account operations.
//!
//! Account management is admin-gated except for self-service profile edits.
//! Deleting an account never touches the business records it owned or was
//! assigned to; those references dangle by design of the data model.

use std::str::FromStr;

use clientele_core::error::CoreError;
use clientele_core::permissions::{self, ActorRef};
use clientele_core::roles::Role;
use clientele_core::types::DbId;
use clientele_db::models::user::{CreateUser, UpdateUser, User};
use clientele_db::repositories::UserRepo;
use clientele_db::DbPool;
use validator::Validate;

use crate::auth::password;
use crate::error::{AppError, AppResult};

/// Environment variable overriding the bootstrap admin password.
pub const BOOTSTRAP_PASSWORD_ENV: &str = "CLIENTELE_ADMIN_PASSWORD";

/// Default bootstrap admin credentials, meant to be changed immediately.
const BOOTSTRAP_USERNAME: &str = "admin";
const BOOTSTRAP_PASSWORD: &str = "admin12345";

/// Input for creating a collaborator account. Carries the plaintext
/// password; hashing happens here, never in the caller.
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
}

/// Input for updating a collaborator account. Only `Some` fields apply.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserInput {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<String>,
}

/// Create a collaborator account (admin only).
pub async fn create(
    pool: &DbPool,
    actor: Option<&ActorRef>,
    input: CreateUserInput,
) -> AppResult<User> {
    // 1. Guard: only admins manage accounts.
    let actor = permissions::require_authenticated(actor)?;
    permissions::require_role(actor, &[Role::Admin])?;

    // 2. Validate the role name and password strength up front.
    let role = Role::from_str(&input.role)?;
    password::validate_password_strength(&input.password)?;

    // 3. Friendly uniqueness prechecks (the unique indexes still back them).
    if UserRepo::find_by_username(pool, &input.username).await?.is_some() {
        return Err(CoreError::Conflict(format!(
            "The username '{}' is already in use",
            input.username
        ))
        .into());
    }
    if UserRepo::find_by_email(pool, &input.email).await?.is_some() {
        return Err(CoreError::Conflict(format!(
            "A user with email '{}' already exists",
            input.email
        ))
        .into());
    }

    // 4. Hash the password and insert.
    let password_hash = password::hash_password(&input.password)
        .map_err(|e| AppError::Internal(format!("Password hashing error: {e}")))?;

    let create = CreateUser {
        username: input.username,
        email: input.email,
        password_hash,
        first_name: input.first_name,
        last_name: input.last_name,
        role: role.as_str().to_string(),
    };
    create.validate()?;

    let user = UserRepo::create(pool, &create).await?;
    tracing::info!(user_id = user.id, username = %user.username, role = %user.role, "user created");
    Ok(user)
}

/// Update a collaborator account.
///
/// Admins may update anyone; everyone else may only update their own
/// profile, and never their own role.
pub async fn update(
    pool: &DbPool,
    actor: Option<&ActorRef>,
    user_id: DbId,
    input: UpdateUserInput,
) -> AppResult<User> {
    // 1. Guard: admin, or self-service on one's own account.
    let actor = permissions::require_authenticated(actor)?;
    let is_admin = actor.role == Role::Admin;
    if !is_admin && actor.id != user_id {
        return Err(CoreError::PermissionDenied(
            "you may only update your own account".into(),
        )
        .into());
    }

    // 2. Role changes are admin-only; validate the new role name.
    let role = match &input.role {
        Some(name) => {
            if !is_admin {
                return Err(CoreError::PermissionDenied(
                    "only an admin may change a user's role".into(),
                )
                .into());
            }
            Some(Role::from_str(name)?.as_str().to_string())
        }
        None => None,
    };

    // 3. Re-hash if a new password was supplied.
    let password_hash = match &input.password {
        Some(plain) => {
            password::validate_password_strength(plain)?;
            Some(
                password::hash_password(plain)
                    .map_err(|e| AppError::Internal(format!("Password hashing error: {e}")))?,
            )
        }
        None => None,
    };

    // 4. Apply; a missing row is a not-found, not a silent no-op.
    let update = UpdateUser {
        username: input.username,
        email: input.email,
        password_hash,
        first_name: input.first_name,
        last_name: input.last_name,
        role,
    };
    let user = UserRepo::update(pool, user_id, &update)
        .await?
        .ok_or(CoreError::NotFound { entity: "user", id: user_id })?;

    tracing::info!(user_id = user.id, "user updated");
    Ok(user)
}

/// Delete a collaborator account (admin only).
///
/// Clients, contracts, and events referencing the account are left in
/// place with dangling references.
pub async fn delete(pool: &DbPool, actor: Option<&ActorRef>, user_id: DbId) -> AppResult<()> {
    // 1. Guard: only admins manage accounts.
    let actor = permissions::require_authenticated(actor)?;
    permissions::require_role(actor, &[Role::Admin])?;

    // 2. Delete; business records keep their references.
    let deleted = UserRepo::delete(pool, user_id).await?;
    if !deleted {
        return Err(CoreError::NotFound { entity: "user", id: user_id }.into());
    }

    tracing::info!(user_id, "user deleted; owned records retain their references");
    Ok(())
}

/// List collaborator accounts, optionally restricted to one role.
pub async fn list(
    pool: &DbPool,
    actor: Option<&ActorRef>,
    role: Option<Role>,
) -> AppResult<Vec<User>> {
    permissions::require_authenticated(actor)?;
    Ok(UserRepo::list(pool, role.map(|r| r.as_str())).await?)
}

/// Ensure at least one admin account exists, creating the bootstrap one if
/// none does. Returns the created account, or `None` when an admin already
/// existed.
///
/// The bootstrap password comes from `CLIENTELE_ADMIN_PASSWORD` when set.
pub async fn ensure_bootstrap_admin(pool: &DbPool) -> AppResult<Option<User>> {
    if UserRepo::find_first_by_role(pool, Role::Admin.as_str()).await?.is_some() {
        return Ok(None);
    }

    let password =
        std::env::var(BOOTSTRAP_PASSWORD_ENV).unwrap_or_else(|_| BOOTSTRAP_PASSWORD.to_string());
    let password_hash = password::hash_password(&password)
        .map_err(|e| AppError::Internal(format!("Password hashing error: {e}")))?;

    let create = CreateUser {
        username: BOOTSTRAP_USERNAME.to_string(),
        email: "admin@localhost".to_string(),
        password_hash,
        first_name: "Default".to_string(),
        last_name: "Admin".to_string(),
        role: Role::Admin.as_str().to_string(),
    };

    let user = UserRepo::create(pool, &create).await?;
    tracing::warn!(
        username = BOOTSTRAP_USERNAME,
        "bootstrap admin created; change its password immediately"
    );
    Ok(Some(user))
}
