//! Authentication: credential verification and session lifecycle.

pub mod password;
pub mod session;

use clientele_core::error::CoreError;
use clientele_db::models::user::User;
use clientele_db::repositories::UserRepo;
use clientele_db::DbPool;

use crate::error::{AppError, AppResult};
use session::{Session, SessionStore};

/// Authenticate a (username, password) pair and issue a session.
///
/// On success the session record replaces any prior one in the store and the
/// session value is returned for explicit threading through the operation
/// layer. Unknown usernames and wrong passwords fail identically.
pub async fn authenticate(
    pool: &DbPool,
    store: &SessionStore,
    username: &str,
    password: &str,
) -> AppResult<Session> {
    // 1. Find the user by username.
    let user = UserRepo::find_by_username(pool, username).await?.ok_or_else(|| {
        CoreError::AuthenticationFailed("Invalid username or password".into())
    })?;

    // 2. Verify the password against the stored verifier.
    let password_valid = password::verify_password(password, &user.password_hash)
        .map_err(|e| AppError::Internal(format!("Password verification error: {e}")))?;

    if !password_valid {
        return Err(
            CoreError::AuthenticationFailed("Invalid username or password".into()).into(),
        );
    }

    // 3. Issue and persist the session, replacing any prior record.
    let session = Session::issue(&user);
    store.save(&session)?;

    tracing::info!(username = %user.username, role = %user.role, "login successful");
    Ok(session)
}

/// Resolve the current actor from the session store.
///
/// Returns `None` when no live session exists or when the session points at
/// a user that no longer exists.
pub async fn current_actor(pool: &DbPool, store: &SessionStore) -> AppResult<Option<User>> {
    let Some(session) = store.current() else {
        return Ok(None);
    };
    Ok(UserRepo::find_by_id(pool, session.user_id).await?)
}

/// End the current session. Idempotent; returns whether one existed.
pub fn end_session(store: &SessionStore) -> bool {
    let existed = store.clear();
    if existed {
        tracing::info!("logout successful");
    }
    existed
}
