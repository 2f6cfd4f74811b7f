use std::sync::Arc;

use prep_core::model::{Category, SessionData, SessionId};
use storage::LocalStore;
use storage::local_store::SESSION_DATA_KEY;
use storage::repository::{KeyValueBackend, Storage};
use storage::sqlite::SqliteRepository;

#[tokio::test]
async fn sqlite_backend_upserts_and_removes() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_kv_upsert?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");
    // migrations are idempotent
    repo.migrate().await.expect("migrate twice");

    repo.set_item("a", "1").await.unwrap();
    repo.set_item("a", "2").await.unwrap();
    repo.set_item("b", "3").await.unwrap();
    assert_eq!(repo.get_item("a").await.unwrap().as_deref(), Some("2"));

    repo.remove_item("a").await.unwrap();
    repo.remove_item("a").await.unwrap();
    assert_eq!(repo.get_item("a").await.unwrap(), None);

    repo.clear().await.unwrap();
    assert_eq!(repo.get_item("b").await.unwrap(), None);
}

#[tokio::test]
async fn session_record_survives_sqlite_round_trip() {
    let storage = Storage::sqlite("sqlite:file:memdb_kv_session?mode=memory&cache=shared")
        .await
        .expect("open storage");
    let store = LocalStore::new(Arc::clone(&storage.backend));

    let mut session = SessionData::new(
        Category::General,
        vec!["rust".into(), "docker".into()],
        1_700_000_000_000,
        SessionId::from_parts(1_700_000_000_000, "k3x9zq"),
    );
    session.record_access("q-7".parse().unwrap());

    assert!(store.is_available().await);
    assert!(store.set(SESSION_DATA_KEY, &session).await);
    let loaded: Option<SessionData> = store.get(SESSION_DATA_KEY).await;
    assert_eq!(loaded, Some(session));
}
