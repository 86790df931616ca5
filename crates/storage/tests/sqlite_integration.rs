use std::sync::Arc;

use academy_core::model::{ModuleId, PathId, PathProgress, SectionId};
use academy_core::time::fixed_now;
use storage::repository::{PathProgressRecord, ProgressRepository};
use storage::sqlite::SqliteRepository;
use storage::store::ProgressStore;

fn sample_progress() -> PathProgress {
    let mut progress = PathProgress::new();
    let module = ModuleId::new("bitcoin-fundamentals");

    progress
        .ensure_section(&module, &SectionId::new("what-is-bitcoin"), 3)
        .mark_complete(fixed_now());
    progress
        .ensure_section(&module, &SectionId::new("the-blockchain"), 2)
        .toggle_checkbox(0, fixed_now());
    progress
}

#[tokio::test]
async fn sqlite_round_trips_progress_payloads() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_roundtrip?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let record = PathProgressRecord::from_progress(&sample_progress());
    repo.save("progress:bitcoin", &record).await.unwrap();

    let loaded = repo.load("progress:bitcoin").await.expect("load").unwrap();
    assert_eq!(loaded, record);
    assert_eq!(loaded.into_progress(), sample_progress());
}

#[tokio::test]
async fn sqlite_save_overwrites_last_write_wins() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_overwrite?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let first = PathProgressRecord::from_progress(&sample_progress());
    repo.save("progress:bitcoin", &first).await.unwrap();

    let mut updated = sample_progress();
    updated
        .ensure_section(
            &ModuleId::new("bitcoin-fundamentals"),
            &SectionId::new("the-blockchain"),
            2,
        )
        .mark_complete(fixed_now());
    let second = PathProgressRecord::from_progress(&updated);
    repo.save("progress:bitcoin", &second).await.unwrap();

    let loaded = repo.load("progress:bitcoin").await.expect("load").unwrap();
    assert_eq!(loaded, second);
}

#[tokio::test]
async fn sqlite_reset_removes_the_row() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_reset?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let record = PathProgressRecord::from_progress(&sample_progress());
    repo.save("progress:bitcoin", &record).await.unwrap();
    repo.reset("progress:bitcoin").await.unwrap();

    assert!(repo.load("progress:bitcoin").await.expect("load").is_none());
}

#[tokio::test]
async fn malformed_payload_fails_open_through_the_store() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_malformed?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    sqlx::query("INSERT INTO path_progress (key, payload, updated_at) VALUES (?1, ?2, ?3)")
        .bind("progress:bitcoin")
        .bind("{ not json")
        .bind("2024-03-09T16:00:00Z")
        .execute(repo.pool())
        .await
        .expect("insert garbage");

    let store = ProgressStore::new(Arc::new(repo));
    let progress = store.load(&PathId::new("bitcoin")).await;
    assert!(progress.is_empty());
}

#[tokio::test]
async fn store_round_trips_through_sqlite() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_store?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let repo = Arc::new(repo);
    let path = PathId::new("bitcoin");

    let store = ProgressStore::new(Arc::clone(&repo) as Arc<dyn ProgressRepository>);
    store.save(&path, &sample_progress()).await;

    // Fresh store over the same database simulates a new session.
    let fresh = ProgressStore::new(repo as Arc<dyn ProgressRepository>);
    assert_eq!(fresh.load(&path).await, sample_progress());
}
