//! DatasetStore Tests
//!
//! - exactly-once loading under concurrent first callers
//! - a cancelled first caller leaves the in-flight load running
//! - shared, non-retried failures
//! - sorted listing and point lookups agree

use std::sync::Arc;
use std::time::Duration;

use crate::core::dex::{DatasetStore, LoadError};
use crate::tests::common::{dataset_json, starter_records, StaticSource};

// =============================================================================
// Exactly-once Loading
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_first_loads_read_once() {
    let source = Arc::new(
        StaticSource::new(dataset_json(&starter_records())).with_delay(Duration::from_millis(50)),
    );
    let store = Arc::new(DatasetStore::new(source.clone()));

    let handles: Vec<_> = (0..32)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .load()
                    .await
                    .map(|d| d.all_sorted_by_id().iter().map(|p| p.id).collect::<Vec<_>>())
            })
        })
        .collect();

    let results: Vec<Vec<u32>> = futures::future::join_all(handles)
        .await
        .into_iter()
        .map(|r| r.expect("task panicked").expect("load failed"))
        .collect();

    assert_eq!(source.reads(), 1);
    assert!(results.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(results[0].len(), starter_records().len());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_failures_share_one_error() {
    let source = Arc::new(StaticSource::missing().with_delay(Duration::from_millis(50)));
    let store = Arc::new(DatasetStore::new(source.clone()));

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.load().await.map(|_| ()).unwrap_err() })
        })
        .collect();

    let errors: Vec<Arc<LoadError>> = futures::future::join_all(handles)
        .await
        .into_iter()
        .map(|r| r.expect("task panicked"))
        .collect();

    assert_eq!(source.reads(), 1);
    assert!(errors.iter().all(|e| Arc::ptr_eq(e, &errors[0])));
    assert!(matches!(*errors[0], LoadError::SourceNotFound { .. }));
}

#[tokio::test]
async fn test_failed_load_is_not_retried() {
    let source = Arc::new(StaticSource::missing());
    let store = DatasetStore::new(source.clone());

    assert!(store.load().await.is_err());
    assert!(store.load().await.is_err());
    assert!(store.by_id(1).await.is_err());
    assert_eq!(source.reads(), 1);
    assert!(store.is_settled());
}

#[tokio::test]
async fn test_load_is_lazy() {
    let source = Arc::new(StaticSource::new(dataset_json(&starter_records())));
    let store = DatasetStore::new(source.clone());

    assert!(!store.is_settled());
    assert_eq!(source.reads(), 0);

    store.load().await.unwrap();
    store.load().await.unwrap();
    assert!(store.is_settled());
    assert_eq!(source.reads(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_cancelled_first_caller_does_not_restart_load() {
    let source = Arc::new(
        StaticSource::new(dataset_json(&starter_records())).with_delay(Duration::from_millis(200)),
    );
    let store = Arc::new(DatasetStore::new(source.clone()));

    let first = {
        let store = store.clone();
        tokio::spawn(async move { store.load().await.map(|d| d.len()) })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    first.abort();
    assert!(first.await.unwrap_err().is_cancelled());
    assert!(!store.is_settled());

    let dataset = store.load().await.unwrap();
    assert_eq!(dataset.len(), starter_records().len());
    assert_eq!(source.reads(), 1);
}

// =============================================================================
// Failure Kinds
// =============================================================================

#[tokio::test]
async fn test_malformed_source() {
    let store = DatasetStore::new(Arc::new(StaticSource::new("{ \"1\": { \"id\": ")));
    let err = store.load().await.unwrap_err();
    assert!(matches!(*err, LoadError::Malformed { .. }));
}

#[tokio::test]
async fn test_missing_file_source() {
    let dir = tempfile::tempdir().unwrap();
    let store = DatasetStore::from_path(dir.path().join("absent.json"));
    let err = store.load().await.unwrap_err();
    assert!(matches!(*err, LoadError::SourceNotFound { .. }));
}

#[tokio::test]
async fn test_directory_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = DatasetStore::from_path(dir.path());
    let err = store.load().await.unwrap_err();
    assert!(matches!(*err, LoadError::Io(_)));
}

#[tokio::test]
async fn test_file_source_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pokemon.json");
    std::fs::write(&path, dataset_json(&starter_records())).unwrap();

    let store = DatasetStore::from_path(&path);
    let pikachu = store.by_id(25).await.unwrap().unwrap();
    assert_eq!(pikachu.name, "pikachu");
    assert_eq!(pikachu.stats.len(), 6);
}

// =============================================================================
// Listing and Lookup
// =============================================================================

#[tokio::test]
async fn test_by_id_agrees_with_sorted_listing() {
    let mut records = starter_records();
    records.reverse();
    let store = DatasetStore::new(Arc::new(StaticSource::new(dataset_json(&records))));

    let all = store.all_sorted_by_id().await.unwrap();
    assert!(all.windows(2).all(|w| w[0].id < w[1].id));

    for record in &records {
        let found = store.by_id(record.id).await.unwrap().expect("present id");
        assert_eq!(found, record);

        let positions: Vec<usize> = all
            .iter()
            .enumerate()
            .filter(|(_, p)| p.id == record.id)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(positions.len(), 1);
        let expected = all.iter().filter(|p| p.id < record.id).count();
        assert_eq!(positions[0], expected);
    }
}

#[tokio::test]
async fn test_absent_id_is_not_an_error() {
    let store = DatasetStore::new(Arc::new(StaticSource::new(dataset_json(&starter_records()))));
    assert_eq!(store.by_id(9999).await.unwrap(), None);
}
