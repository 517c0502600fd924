use pretty_assertions::assert_eq;
use std::time::Duration;
use stoa_core::{config::SyncConfig, schema::TableRef, Job};
use tests::Fixture;

#[tokio::test]
async fn failed_job_leaves_no_trace() {
    let fixture = Fixture::new().await;
    let mut conn = fixture.connect().await;
    let sync = fixture.sync_with(SyncConfig::default().max_attempts(1));

    fixture.memory.fail_next_statements(1);
    let err = sync
        .ensure_doc_part(&mut conn, "shop", "orders", &TableRef::root())
        .await
        .unwrap_err();

    assert!(err.is_backend_statement());
    assert!(err.is_retryable());
    assert!(err.to_string().contains("create schema `shop`"), "{err}");

    assert_eq!(fixture.model.version(), 0);
    assert_eq!(fixture.memory.schemas(), ["stoa"]);
    assert_eq!(fixture.log().rollbacks(), 1);
    assert!(!conn.in_transaction());
    assert!(conn.load_snapshot().await.unwrap().databases().next().is_none());
}

#[tokio::test]
async fn closing_discards_uncommitted_work() {
    let fixture = Fixture::new().await;
    let mut conn = fixture.connect().await;
    fixture.sync.ensure_database(&mut conn, "shop").await.unwrap();

    let before = fixture.model.snapshot();
    let delta = Job::add_collection("shop", "orders")
        .execute(&before, &mut conn)
        .await
        .unwrap();
    assert!(!delta.is_empty());
    assert!(conn.in_transaction());

    conn.close().await.unwrap();

    assert_eq!(fixture.log().rollbacks(), 1);
    assert_eq!(fixture.memory.schemas(), ["shop", "stoa"]);
    assert!(fixture
        .memory
        .tables()
        .iter()
        .all(|table| table.schema != "shop"));
    assert_eq!(*fixture.model.snapshot(), *before);

    let mut fresh = fixture.connect().await;
    let persisted = fresh.load_snapshot().await.unwrap();
    assert_eq!(persisted.to_rows(), before.to_rows());
    assert!(persisted.collection("shop", "orders").is_none());
}

#[tokio::test]
async fn retryable_failure_is_retried() {
    let fixture = Fixture::new().await;
    let mut conn = fixture.connect().await;

    let sync = fixture.sync_with(
        SyncConfig::default()
            .max_attempts(3)
            .retry_wait(Duration::from_millis(10)),
    );
    fixture.memory.fail_next_statements(2);

    let database = sync.ensure_database(&mut conn, "shop").await.unwrap();
    assert_eq!(database.identifier, "shop");

    assert_eq!(fixture.log().rollbacks(), 2);
    assert_eq!(fixture.memory.schemas(), ["shop", "stoa"]);
    assert_eq!(fixture.model.version(), 1);
}

#[tokio::test]
async fn retries_are_bounded() {
    let fixture = Fixture::new().await;
    let mut conn = fixture.connect().await;
    let sync = fixture.sync_with(
        SyncConfig::default()
            .max_attempts(2)
            .retry_wait(Duration::from_millis(10)),
    );

    fixture.memory.fail_next_statements(5);
    let err = sync.ensure_database(&mut conn, "shop").await.unwrap_err();

    assert!(err.is_retryable());
    assert_eq!(fixture.log().rollbacks(), 2);
    assert_eq!(fixture.memory.schemas(), ["stoa"]);
}

#[tokio::test]
async fn failed_rollback_breaks_the_connection() {
    let fixture = Fixture::new().await;
    let mut conn = fixture.connect().await;

    fixture.memory.fail_next_statements(1);
    fixture.memory.fail_next_rollback();

    let err = fixture
        .sync
        .ensure_database(&mut conn, "shop")
        .await
        .unwrap_err();

    assert!(err.is_rollback_failed());
    assert!(!err.is_retryable());
    assert!(err.cause().unwrap().is_retryable());
    assert!(conn.is_broken());

    // A broken connection refuses further work
    assert!(fixture
        .sync
        .ensure_database(&mut conn, "shop")
        .await
        .is_err());
    assert_eq!(fixture.model.version(), 0);

    // Other connections are unaffected
    let mut other = fixture.connect().await;
    fixture
        .sync
        .ensure_database(&mut other, "shop")
        .await
        .unwrap();
}
