use pretty_assertions::assert_eq;
use std::time::Duration;
use stoa_core::{
    config::SyncConfig,
    driver::{Capability, IdentifierConstraints},
    schema::{db::TableName, FieldType, TableRef},
    BackendConnection, Driver, Job,
};
use tests::Fixture;

#[tokio::test]
async fn losing_writer_reuses_the_winning_mapping() {
    let fixture = Fixture::new().await;
    let mut a = fixture.connect().await;
    let mut b = fixture.connect().await;

    fixture
        .sync
        .ensure_doc_part(&mut a, "shop", "orders", &TableRef::root())
        .await
        .unwrap();

    // `a` adds the column but has not committed yet
    let stale = fixture.model.snapshot();
    let delta = Job::add_field("shop", "orders", TableRef::root(), "name", FieldType::String)
        .execute(&stale, &mut a)
        .await
        .unwrap();
    assert!(!delta.is_empty());
    assert!(a.in_transaction());

    let winner = fixture
        .sync
        .ensure_field(&mut b, "shop", "orders", &TableRef::root(), "name", FieldType::String)
        .await
        .unwrap();

    let err = a.commit().await.unwrap_err();
    assert!(err.is_retryable(), "{err}");
    a.rollback().await.unwrap();

    let field = fixture
        .sync
        .ensure_field(&mut a, "shop", "orders", &TableRef::root(), "name", FieldType::String)
        .await
        .unwrap();

    assert_eq!(field, winner);
    assert_eq!(
        fixture
            .memory
            .columns(&TableName::new("shop", "orders"))
            .unwrap(),
        ["did", "name_s"]
    );
}

#[tokio::test]
async fn racing_collections_get_distinct_tables() {
    let fixture = Fixture::with_capability(Capability {
        identifier: IdentifierConstraints {
            max_length: 9,
            ..IdentifierConstraints::POSTGRESQL
        },
        ..Capability::POSTGRESQL
    })
    .await;
    let mut a = fixture.connect().await;
    let mut b = fixture.connect().await;

    fixture.sync.ensure_database(&mut a, "shop").await.unwrap();

    // Both names truncate to the same table while neither writer has
    // committed
    let stale = fixture.model.snapshot();
    let delta = Job::add_collection("shop", "orders_europe")
        .execute(&stale, &mut a)
        .await
        .unwrap();
    Job::add_collection("shop", "orders_eu_west")
        .execute(&stale, &mut b)
        .await
        .unwrap();

    a.commit().await.unwrap();
    fixture.model.merge(&delta);

    let err = b.commit().await.unwrap_err();
    assert!(err.is_retryable(), "{err}");
    b.rollback().await.unwrap();

    let eu_west = fixture
        .sync
        .ensure_collection(&mut b, "shop", "orders_eu_west")
        .await
        .unwrap();
    assert_eq!(eu_west.identifier, "orders_e2");

    let snapshot = fixture.model.snapshot();
    assert_eq!(
        snapshot.collection("shop", "orders_europe").unwrap().identifier,
        "orders_e1"
    );
    assert_eq!(
        fixture
            .memory
            .tables()
            .into_iter()
            .filter(|table| table.schema == "shop")
            .map(|table| table.table)
            .collect::<Vec<_>>(),
        ["orders_e1", "orders_e2"]
    );

    let persisted = a.load_snapshot().await.unwrap();
    assert_eq!(persisted.to_rows(), snapshot.to_rows());
}

#[tokio::test]
async fn conflict_is_retried_by_the_executor() {
    let fixture = Fixture::new().await;
    let mut a = fixture.connect().await;
    let mut b = fixture.connect().await;

    // Both writers race to create the same database; `b` commits in between
    // `a`'s statements and its commit.
    let stale = fixture.model.snapshot();
    Job::add_database("shop")
        .execute(&stale, &mut a)
        .await
        .unwrap();
    fixture.sync.ensure_database(&mut b, "shop").await.unwrap();

    assert!(a.commit().await.unwrap_err().is_retryable());
    a.rollback().await.unwrap();

    let version = fixture.model.version();
    let database = fixture.sync.ensure_database(&mut a, "shop").await.unwrap();
    assert_eq!(database.identifier, "shop");
    assert_eq!(fixture.model.version(), version);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_writers_converge() {
    let fixture = Fixture::new().await;
    let sync = fixture.sync_with(
        SyncConfig::default()
            .max_attempts(5)
            .retry_wait(Duration::from_millis(200)),
    );

    let mut tasks = vec![];
    for _ in 0..8 {
        let driver = fixture.driver.clone();
        let sync = sync.clone();

        tasks.push(tokio::spawn(async move {
            let mut conn = BackendConnection::new(
                driver.connect().await.unwrap(),
                driver.capability().clone(),
            );
            let field = sync
                .ensure_field(
                    &mut conn,
                    "shop",
                    "orders",
                    &TableRef::from_path(["items"]),
                    "sku",
                    FieldType::String,
                )
                .await
                .unwrap();
            conn.close().await.unwrap();
            field
        }));
    }

    let mut fields = vec![];
    for task in tasks {
        fields.push(task.await.unwrap());
    }

    assert!(fields.iter().all(|field| field.identifier == "sku_s"));

    let snapshot = fixture.model.snapshot();
    let collection = snapshot.collection("shop", "orders").unwrap();
    assert_eq!(collection.doc_parts().count(), 2);
    assert_eq!(
        fixture
            .memory
            .columns(&TableName::new("shop", "orders_items"))
            .unwrap(),
        ["did", "rid", "pid", "seq", "sku_s"]
    );

    // The model matches what the backend persisted
    let mut conn = fixture.connect().await;
    let persisted = conn.load_snapshot().await.unwrap();
    assert_eq!(persisted.to_rows(), snapshot.to_rows());
}
