//! File-backed session record with lazy expiry.
//!
//! A successful login writes one JSON object to a per-user file; every later
//! invocation reads it back to answer "who is acting". Expiry is never swept
//! by a timer: an expired or unreadable record is detected (and deleted) on
//! the next lookup. The file is shared mutable state across concurrent
//! invocations with last-writer-wins semantics; sessions are single-actor,
//! single-machine constructs, not a distributed lock.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::Utc;
use clientele_core::error::CoreError;
use clientele_core::permissions::ActorRef;
use clientele_core::roles::Role;
use clientele_core::types::{DbId, Timestamp};
use clientele_db::models::user::User;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Session lifetime in hours.
pub const SESSION_TTL_HOURS: i64 = 12;

/// File name of the per-user session record, placed in the home directory.
const SESSION_FILE_NAME: &str = ".clientele_session";

/// The session record persisted between invocations.
///
/// The role is stored as its canonical name; an unparseable role is treated
/// the same as a corrupted record (not authenticated).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub user_id: DbId,
    pub username: String,
    pub role: String,
    pub issued_at: Timestamp,
    pub expires_at: Timestamp,
}

impl Session {
    /// Issue a fresh session for the given user, valid for
    /// [`SESSION_TTL_HOURS`] from now.
    pub fn issue(user: &User) -> Self {
        let issued_at = Utc::now();
        Self {
            user_id: user.id,
            username: user.username.clone(),
            role: user.role.clone(),
            issued_at,
            expires_at: issued_at + chrono::Duration::hours(SESSION_TTL_HOURS),
        }
    }

    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        now > self.expires_at
    }

    /// The actor view used by permission checks.
    pub fn actor_ref(&self) -> Result<ActorRef, CoreError> {
        Ok(ActorRef { id: self.user_id, role: Role::from_str(&self.role)? })
    }
}

/// Owns the session file location and all reads/writes against it.
///
/// Only the outermost entry point should hold one of these; operations
/// receive the resolved [`Session`] value explicitly.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default per-user location: `$HOME/.clientele_session`, falling back
    /// to the temp directory when no home is set.
    pub fn default_path() -> PathBuf {
        std::env::var_os("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir)
            .join(SESSION_FILE_NAME)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist the session record, replacing any prior one.
    ///
    /// On unix the file is made readable only by its owner.
    pub fn save(&self, session: &Session) -> AppResult<()> {
        let json = serde_json::to_string(session)
            .map_err(|e| AppError::Internal(format!("Failed to encode session: {e}")))?;
        fs::write(&self.path, json)
            .map_err(|e| AppError::Internal(format!("Failed to write session file: {e}")))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600)).map_err(|e| {
                AppError::Internal(format!("Failed to restrict session file permissions: {e}"))
            })?;
        }

        Ok(())
    }

    /// Read the current session, if a live one exists.
    ///
    /// Absent file, expired record, and unreadable record all mean "not
    /// authenticated"; the latter two also delete the file (lazy expiry).
    /// Parse failures are never surfaced.
    pub fn current(&self) -> Option<Session> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return None,
            Err(err) => {
                tracing::warn!(error = %err, "failed to read session file; treating as absent");
                return None;
            }
        };

        let session: Session = match serde_json::from_str(&raw) {
            Ok(session) => session,
            Err(_) => {
                tracing::warn!("session file is corrupted; removing it");
                self.clear();
                return None;
            }
        };

        if session.is_expired_at(Utc::now()) {
            tracing::info!(username = %session.username, "session expired; removing record");
            self.clear();
            return None;
        }

        Some(session)
    }

    /// Delete the session record. Idempotent; returns whether one existed.
    pub fn clear(&self) -> bool {
        match fs::remove_file(&self.path) {
            Ok(()) => true,
            Err(err) if err.kind() == ErrorKind::NotFound => false,
            Err(err) => {
                tracing::warn!(error = %err, "failed to remove session file");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_session(expires_in: Duration) -> Session {
        let now = Utc::now();
        Session {
            user_id: 1,
            username: "jdoe".to_string(),
            role: "commercial".to_string(),
            issued_at: now,
            expires_at: now + expires_in,
        }
    }

    fn temp_store() -> (tempfile::TempDir, SessionStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SessionStore::new(dir.path().join("session.json"));
        (dir, store)
    }

    #[test]
    fn test_save_then_current_roundtrip() {
        let (_dir, store) = temp_store();
        store.save(&sample_session(Duration::hours(12))).expect("save");

        let loaded = store.current().expect("live session expected");
        assert_eq!(loaded.user_id, 1);
        assert_eq!(loaded.username, "jdoe");
        assert_eq!(loaded.role, "commercial");
    }

    #[test]
    fn test_absent_file_means_unauthenticated() {
        let (_dir, store) = temp_store();
        assert!(store.current().is_none());
    }

    #[test]
    fn test_expired_session_is_removed_on_lookup() {
        let (_dir, store) = temp_store();
        store.save(&sample_session(Duration::minutes(-1))).expect("save");

        assert!(store.current().is_none());
        assert!(!store.path().exists(), "expired record must be deleted");
    }

    #[test]
    fn test_session_valid_just_under_ttl_and_invalid_past_it() {
        let (_dir, store) = temp_store();

        // Valid at T+11h59m.
        store.save(&sample_session(Duration::minutes(11 * 60 + 59))).expect("save");
        assert!(store.current().is_some());

        // Invalid at T+12h01m (record written as already one minute stale).
        store.save(&sample_session(Duration::minutes(-1))).expect("save");
        assert!(store.current().is_none());
    }

    #[test]
    fn test_corrupted_record_is_removed_silently() {
        let (_dir, store) = temp_store();
        fs::write(store.path(), "{not valid json").expect("write");

        assert!(store.current().is_none());
        assert!(!store.path().exists(), "corrupted record must be deleted");
    }

    #[test]
    fn test_clear_is_idempotent() {
        let (_dir, store) = temp_store();
        store.save(&sample_session(Duration::hours(1))).expect("save");

        assert!(store.clear(), "first clear removes the record");
        assert!(!store.clear(), "second clear is a no-op");
    }

    #[test]
    fn test_actor_ref_parses_role() {
        let session = sample_session(Duration::hours(1));
        let actor = session.actor_ref().expect("role must parse");
        assert_eq!(actor.id, 1);
        assert_eq!(actor.role, Role::Commercial);
    }

    #[test]
    fn test_actor_ref_rejects_unknown_role() {
        let mut session = sample_session(Duration::hours(1));
        session.role = "superuser".to_string();
        assert!(session.actor_ref().is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_session_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let (_dir, store) = temp_store();
        store.save(&sample_session(Duration::hours(1))).expect("save");

        let mode = fs::metadata(store.path()).expect("metadata").permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
