use chrono::Duration;
use clinic_portal::models::Role;
use clinic_portal::session::{InMemorySessionStore, SessionStore};
use uuid::Uuid;

#[tokio::test]
async fn created_session_resolves_to_its_payload() {
    let store = InMemorySessionStore::new();
    let session_id = store.create(42, Role::Patient, Duration::hours(1)).await;

    let data = store.resolve(session_id).await.expect("session must exist");
    assert_eq!(data.user_id, 42);
    assert_eq!(data.role, Role::Patient);
}

#[tokio::test]
async fn unknown_session_resolves_to_none() {
    let store = InMemorySessionStore::new();
    assert!(store.resolve(Uuid::new_v4()).await.is_none());
}

#[tokio::test]
async fn expired_session_is_evicted_on_resolve() {
    let store = InMemorySessionStore::new();
    let session_id = store.create(7, Role::Admin, Duration::seconds(-1)).await;

    assert!(store.resolve(session_id).await.is_none());
    // Second resolve hits the already-evicted path.
    assert!(store.resolve(session_id).await.is_none());
}

#[tokio::test]
async fn destroyed_session_no_longer_resolves() {
    let store = InMemorySessionStore::new();
    let session_id = store.create(7, Role::Doctor, Duration::hours(1)).await;

    store.destroy(session_id).await;
    assert!(store.resolve(session_id).await.is_none());
}

#[tokio::test]
async fn destroying_an_unknown_session_is_a_noop() {
    let store = InMemorySessionStore::new();
    store.destroy(Uuid::new_v4()).await;
}

#[tokio::test]
async fn sessions_are_independent() {
    let store = InMemorySessionStore::new();
    let first = store.create(1, Role::Patient, Duration::hours(1)).await;
    let second = store.create(2, Role::Manager, Duration::hours(1)).await;

    store.destroy(first).await;

    let data = store.resolve(second).await.expect("second session survives");
    assert_eq!(data.user_id, 2);
}
