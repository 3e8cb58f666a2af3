//! End-to-end ledger tests against a temporary LanceDB database.

use std::sync::Arc;
use verifold_db::{Database, DiscoveryFilter, DiscoveryRepository};
use verifold_test_utils::{random_sequence, DiscoveryBuilder};

async fn open_repo(dir: &tempfile::TempDir) -> DiscoveryRepository {
    let db = Database::open(dir.path().join("ledger")).await.unwrap();
    db.initialize().await.unwrap();
    DiscoveryRepository::new(Arc::new(db))
}

#[tokio::test]
async fn test_insert_and_find_by_id() {
    let dir = tempfile::tempdir().unwrap();
    let repo = open_repo(&dir).await;

    let discovery = DiscoveryBuilder::new().validation_score(0.82).build();
    repo.insert(&discovery).await.unwrap();

    let found = repo.find_by_id(discovery.id).await.unwrap().unwrap();
    assert_eq!(found.sequence, discovery.sequence);
    assert_eq!(found.sequence_hash, discovery.sequence_hash);
    assert!((found.validation_score - 0.82).abs() < 1e-9);

    let missing = repo.find_by_id(uuid::Uuid::new_v4()).await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_fingerprint_dedup_check() {
    let dir = tempfile::tempdir().unwrap();
    let repo = open_repo(&dir).await;

    let discovery = DiscoveryBuilder::new().build();
    assert!(!repo
        .exists_by_sequence_hash(discovery.sequence_hash)
        .await
        .unwrap());

    repo.insert(&discovery).await.unwrap();
    assert!(repo
        .exists_by_sequence_hash(discovery.sequence_hash)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_batch_insert_filtering_and_pagination() {
    let dir = tempfile::tempdir().unwrap();
    let repo = open_repo(&dir).await;

    let mut batch = Vec::new();
    for i in 0..30 {
        let priority = if i % 3 == 0 { "HIGH" } else { "LOW" };
        batch.push(
            DiscoveryBuilder::new()
                .sequence(random_sequence(40, i))
                .priority(priority)
                .druglikeness(if i % 3 == 0 { 0.8 } else { 0.3 })
                .build(),
        );
    }
    repo.insert_batch(&batch).await.unwrap();

    assert_eq!(repo.count().await.unwrap(), 30);

    let high_filter = DiscoveryFilter {
        priority: Some("HIGH".to_string()),
        ..Default::default()
    };
    assert_eq!(repo.count_filtered(&high_filter).await.unwrap(), 10);

    let page = repo.list(&DiscoveryFilter::default(), 0, 20).await.unwrap();
    assert_eq!(page.len(), 20);
    let rest = repo.list(&DiscoveryFilter::default(), 20, 20).await.unwrap();
    assert_eq!(rest.len(), 10);
}

#[tokio::test]
async fn test_search_filter_matches_sequence_substring() {
    let dir = tempfile::tempdir().unwrap();
    let repo = open_repo(&dir).await;

    let needle = DiscoveryBuilder::new()
        .sequence("MKVLAWFHDERTGYNQCSPIAKLVWMDE")
        .build();
    let other = DiscoveryBuilder::new()
        .sequence(random_sequence(50, 99))
        .build();
    repo.insert_batch(&[needle.clone(), other]).await.unwrap();

    let filter = DiscoveryFilter {
        search: Some("WFHDERT".to_string()),
        ..Default::default()
    };
    let hits = repo.list(&filter, 0, 10).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, needle.id);
}

#[tokio::test]
async fn test_stats_track_duplicates_and_tiers() {
    let dir = tempfile::tempdir().unwrap();
    let repo = open_repo(&dir).await;

    let seq = random_sequence(40, 1);
    let records = vec![
        DiscoveryBuilder::new()
            .sequence(seq.clone())
            .validation_score(0.95)
            .build(),
        // Same sequence again: counted as a duplicate fingerprint.
        DiscoveryBuilder::new()
            .sequence(seq)
            .validation_score(0.95)
            .build(),
        DiscoveryBuilder::new()
            .sequence(random_sequence(40, 2))
            .validation_score(0.82)
            .build(),
        DiscoveryBuilder::new()
            .sequence(random_sequence(40, 3))
            .validation_score(0.45)
            .build(),
    ];
    repo.insert_batch(&records).await.unwrap();

    let stats = repo.stats().await.unwrap();
    assert_eq!(stats.total, 4);
    assert_eq!(stats.unique_sequences, 3);
    assert!((stats.duplicate_rate - 25.0).abs() < 1e-9);
    assert_eq!(stats.quality.excellent, 2);
    assert_eq!(stats.quality.very_good, 1);
    assert_eq!(stats.quality.unranked, 1);
    assert_eq!(stats.druggable, 4);
}
