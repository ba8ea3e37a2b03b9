#![expect(clippy::unwrap_used, reason = "test code")]

use std::sync::Arc;
use std::time::Duration;

use studykeep_core::{NoteFilters, StorageMode};
use studykeep_storage::traits::{CourseStore, NoteStore};
use studykeep_storage::{keys, KvStore, LocalStore, MemoryKv};

use crate::{ModeResolver, StaticAuth};

fn resolver(auth: StaticAuth) -> (Arc<MemoryKv>, ModeResolver) {
    let kv = Arc::new(MemoryKv::new());
    let local = LocalStore::new(kv.clone());
    (kv.clone(), ModeResolver::new(Arc::new(auth), kv, local))
}

#[tokio::test]
async fn authenticated_resolves_remote_and_marks_the_profile() {
    let (kv, resolver) = resolver(StaticAuth::signed_in("user-1"));
    kv.set(keys::STORAGE_MODE, "local");

    assert_eq!(resolver.resolve().await, StorageMode::Remote);

    assert_eq!(kv.get(keys::STORAGE_MODE), None);
    assert!(kv.get(keys::PREVIOUSLY_AUTHENTICATED).is_some());
}

#[tokio::test]
async fn first_anonymous_run_seeds_demo_data_once() {
    let (kv, resolver) = resolver(StaticAuth::anonymous());
    let local = LocalStore::new(kv.clone());

    assert_eq!(resolver.resolve().await, StorageMode::Local);
    assert!(kv.get(keys::STORAGE_INITIALIZED).is_some());
    let seeded = local.list_courses().await.unwrap().len();
    assert!(seeded > 0);

    // Re-resolving must not seed again.
    assert_eq!(resolver.resolve().await, StorageMode::Local);
    assert_eq!(local.list_courses().await.unwrap().len(), seeded);
}

#[tokio::test]
async fn previously_authenticated_profile_is_not_reseeded() {
    let (kv, resolver) = resolver(StaticAuth::anonymous());
    kv.set(keys::PREVIOUSLY_AUTHENTICATED, "true");
    let local = LocalStore::new(kv.clone());

    assert_eq!(resolver.resolve().await, StorageMode::Local);

    assert!(local.list_courses().await.unwrap().is_empty());
    assert!(local.list_notes(&NoteFilters::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn explicit_local_choice_is_cached() {
    let (kv, resolver) = resolver(StaticAuth::anonymous());

    resolver.set_mode_preference(StorageMode::Local);
    assert_eq!(kv.get(keys::STORAGE_MODE).as_deref(), Some("local"));
    assert_eq!(resolver.resolve().await, StorageMode::Local);
    assert_eq!(kv.get(keys::STORAGE_MODE).as_deref(), Some("local"));
}

#[tokio::test]
async fn sign_in_overrides_the_cached_choice() {
    let (kv, resolver) = resolver(StaticAuth::signed_in("user-1"));

    resolver.set_mode_preference(StorageMode::Local);
    assert_eq!(resolver.resolve().await, StorageMode::Remote);
    assert_eq!(kv.get(keys::STORAGE_MODE), None);
}

#[tokio::test]
async fn auth_outage_fails_open_to_local() {
    let (_kv, resolver) = resolver(StaticAuth::failing());
    assert_eq!(resolver.resolve().await, StorageMode::Local);
}

#[tokio::test]
async fn clearing_the_marker_reenables_seeding() {
    let (kv, resolver) = resolver(StaticAuth::anonymous());
    kv.set(keys::PREVIOUSLY_AUTHENTICATED, "true");

    resolver.clear_previous_authentication();
    assert_eq!(resolver.resolve().await, StorageMode::Local);

    let local = LocalStore::new(kv.clone());
    assert!(!local.list_courses().await.unwrap().is_empty());
}

#[tokio::test]
async fn watch_follows_sign_in_and_sign_out() {
    let auth = Arc::new(StaticAuth::anonymous());
    let kv = Arc::new(MemoryKv::new());
    let local = LocalStore::new(kv.clone());
    let resolver = Arc::new(ModeResolver::new(auth.clone(), kv, local));

    let (mut rx, handle) = resolver.watch();
    rx.changed().await.unwrap();
    assert_eq!(*rx.borrow(), StorageMode::Local);

    auth.sign_in("user-1");
    tokio::time::timeout(Duration::from_secs(1), rx.changed()).await.unwrap().unwrap();
    assert_eq!(*rx.borrow(), StorageMode::Remote);

    auth.sign_out();
    tokio::time::timeout(Duration::from_secs(1), rx.changed()).await.unwrap().unwrap();
    assert_eq!(*rx.borrow(), StorageMode::Local);

    handle.abort();
}
