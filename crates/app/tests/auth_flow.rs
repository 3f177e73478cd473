//! Integration tests for the login flow: credential checks, session
//! persistence, and actor resolution.

use sqlx::SqlitePool;

use clientele_app::auth::session::SessionStore;
use clientele_app::auth::{self, password};
use clientele_app::ops;
use clientele_core::permissions::ActorRef;
use clientele_core::roles::Role;
use clientele_db::models::user::CreateUser;
use clientele_db::repositories::UserRepo;

const ADMIN: ActorRef = ActorRef { id: 1_000, role: Role::Admin };

async fn seed_login_user(pool: &SqlitePool, username: &str, plain: &str) -> i64 {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: password::hash_password(plain).expect("hash"),
            first_name: "Test".to_string(),
            last_name: username.to_string(),
            role: Role::Commercial.as_str().to_string(),
        },
    )
    .await
    .expect("seed user");
    user.id
}

fn temp_store() -> (tempfile::TempDir, SessionStore) {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = SessionStore::new(dir.path().join("session.json"));
    (dir, store)
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_roundtrip(pool: SqlitePool) {
    let user_id = seed_login_user(&pool, "alice", "hunter2hunter2").await;
    let (_dir, store) = temp_store();

    let session = auth::authenticate(&pool, &store, "alice", "hunter2hunter2").await.unwrap();
    assert_eq!(session.user_id, user_id);
    assert_eq!(session.role, "commercial");

    // The persisted record resolves back to the same user.
    let actor = auth::current_actor(&pool, &store).await.unwrap().expect("live session");
    assert_eq!(actor.id, user_id);
    assert_eq!(actor.actor_ref().unwrap().role, Role::Commercial);

    // Logout removes the record; a second logout is a no-op.
    assert!(auth::end_session(&store));
    assert!(!auth::end_session(&store));
    assert!(auth::current_actor(&pool, &store).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_failures_are_uniform(pool: SqlitePool) {
    seed_login_user(&pool, "bob", "hunter2hunter2").await;
    let (_dir, store) = temp_store();

    let wrong_password =
        auth::authenticate(&pool, &store, "bob", "not-the-password").await.unwrap_err();
    let unknown_user =
        auth::authenticate(&pool, &store, "nobody", "whatever").await.unwrap_err();

    assert_eq!(wrong_password.kind(), "AUTHENTICATION_FAILED");
    assert_eq!(unknown_user.kind(), "AUTHENTICATION_FAILED");
    assert_eq!(
        wrong_password.message(),
        unknown_user.message(),
        "failures must not reveal whether the username exists"
    );
    assert!(store.current().is_none(), "no session may be written on failure");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_relogin_replaces_session(pool: SqlitePool) {
    seed_login_user(&pool, "carol", "hunter2hunter2").await;
    let dave_id = seed_login_user(&pool, "dave", "hunter2hunter2").await;
    let (_dir, store) = temp_store();

    auth::authenticate(&pool, &store, "carol", "hunter2hunter2").await.unwrap();
    auth::authenticate(&pool, &store, "dave", "hunter2hunter2").await.unwrap();

    let actor = auth::current_actor(&pool, &store).await.unwrap().expect("live session");
    assert_eq!(actor.id, dave_id, "last login wins");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_session_for_deleted_user_resolves_to_none(pool: SqlitePool) {
    let user_id = seed_login_user(&pool, "erin", "hunter2hunter2").await;
    let (_dir, store) = temp_store();

    auth::authenticate(&pool, &store, "erin", "hunter2hunter2").await.unwrap();
    ops::users::delete(&pool, Some(&ADMIN), user_id).await.unwrap();

    // The record still exists on disk but no longer names a real user.
    assert!(store.current().is_some());
    assert!(auth::current_actor(&pool, &store).await.unwrap().is_none());
}
