use pretty_assertions::assert_eq;
use stoa_core::{
    config::TeardownConfig,
    schema::{db::TableName, TableRef},
    teardown::teardown,
};
use tests::Fixture;

async fn orders_chain(fixture: &Fixture) {
    let mut conn = fixture.connect().await;
    fixture
        .sync
        .ensure_doc_part(
            &mut conn,
            "shop",
            "orders",
            &TableRef::from_path(["items", "tags"]),
        )
        .await
        .unwrap();
    conn.close().await.unwrap();
}

#[tokio::test]
async fn dependent_tables_are_dropped_over_rounds() {
    let fixture = Fixture::new().await;
    orders_chain(&fixture).await;

    let mut conn = fixture.connect().await;
    let report = teardown(&mut conn, &TeardownConfig::default(), Some(&fixture.model))
        .await
        .unwrap();

    assert_eq!(report.rounds, 3);
    assert_eq!(
        report
            .dropped_tables
            .iter()
            .filter(|table| table.schema == "shop")
            .map(|table| table.table.as_str())
            .collect::<Vec<_>>(),
        ["orders_items_tags", "orders_items", "orders"]
    );
    assert_eq!(report.dropped_schemas, ["shop", "stoa"]);

    assert!(fixture.memory.schemas().is_empty());
    assert!(fixture.memory.tables().is_empty());
    assert!(fixture.model.snapshot().databases().next().is_none());
}

#[tokio::test]
async fn reference_cycle_is_reported() {
    let fixture = Fixture::new().await;
    let mut conn = fixture.connect().await;

    for collection in ["a", "b"] {
        fixture
            .sync
            .ensure_doc_part(&mut conn, "shop", collection, &TableRef::root())
            .await
            .unwrap();
    }

    let a = TableName::new("shop", "a");
    let b = TableName::new("shop", "b");
    fixture.memory.add_foreign_key(&a, &b).unwrap();
    fixture.memory.add_foreign_key(&b, &a).unwrap();

    let err = teardown(&mut conn, &TeardownConfig::default(), None)
        .await
        .unwrap_err();

    assert!(err.is_teardown_stuck());
    assert_eq!(
        err.teardown_remaining().unwrap(),
        ["shop.a".to_string(), "shop.b".to_string()]
    );
    assert!(!conn.is_broken());
    assert_eq!(
        fixture
            .memory
            .tables()
            .into_iter()
            .filter(|table| table.schema == "shop")
            .collect::<Vec<_>>(),
        [a, b]
    );
}

#[tokio::test]
async fn stuck_teardown_keeps_metadata() {
    let fixture = Fixture::new().await;
    let mut conn = fixture.connect().await;

    for collection in ["a", "b", "c"] {
        fixture
            .sync
            .ensure_doc_part(&mut conn, "shop", collection, &TableRef::root())
            .await
            .unwrap();
    }

    let a = TableName::new("shop", "a");
    let b = TableName::new("shop", "b");
    fixture.memory.add_foreign_key(&a, &b).unwrap();
    fixture.memory.add_foreign_key(&b, &a).unwrap();

    let err = teardown(&mut conn, &TeardownConfig::default(), Some(&fixture.model))
        .await
        .unwrap_err();
    assert!(err.is_teardown_stuck());

    // The model is only reset on success
    assert!(fixture.model.snapshot().database("shop").is_some());

    // Metadata survives, so the backend can still be loaded
    assert!(fixture.memory.schemas().contains(&"stoa".to_string()));
    let snapshot = conn.load_snapshot().await.unwrap();
    conn.commit().await.unwrap();
    let shop = snapshot.database("shop").unwrap();
    assert!(shop.collection("a").is_some());
    assert!(shop.collection("b").is_some());

    // And torn down again, stopping on the same tables
    let err = teardown(&mut conn, &TeardownConfig::default(), Some(&fixture.model))
        .await
        .unwrap_err();
    assert!(err.is_teardown_stuck());
    assert_eq!(
        err.teardown_remaining().unwrap(),
        ["shop.a".to_string(), "shop.b".to_string()]
    );
}

#[tokio::test]
async fn round_limit_is_enforced() {
    let fixture = Fixture::new().await;
    orders_chain(&fixture).await;

    let mut conn = fixture.connect().await;
    let err = teardown(&mut conn, &TeardownConfig::default().max_rounds(2), None)
        .await
        .unwrap_err();

    assert!(err.is_teardown_stuck());
    assert_eq!(
        err.teardown_remaining().unwrap(),
        ["shop.orders".to_string()]
    );
}

#[tokio::test]
async fn undroppable_table_stops_teardown() {
    let fixture = Fixture::new().await;
    orders_chain(&fixture).await;
    fixture
        .memory
        .deny_drop(TableName::new("shop", "orders_items_tags"));

    let mut conn = fixture.connect().await;
    let err = teardown(&mut conn, &TeardownConfig::default(), None)
        .await
        .unwrap_err();

    assert!(err.is_teardown_stuck());
    assert_eq!(
        err.teardown_remaining().unwrap(),
        [
            "shop.orders".to_string(),
            "shop.orders_items".to_string(),
            "shop.orders_items_tags".to_string()
        ]
    );
}

#[tokio::test]
async fn foreign_schemas_are_left_alone() {
    let fixture = Fixture::new().await;
    orders_chain(&fixture).await;

    let legacy = TableName::new("legacy", "accounts");
    fixture.memory.create_unmanaged_table(&legacy);

    let mut conn = fixture.connect().await;
    let report = teardown(&mut conn, &TeardownConfig::default(), None)
        .await
        .unwrap();

    assert!(!report.dropped_tables.contains(&legacy));
    assert_eq!(fixture.memory.schemas(), ["legacy"]);
    assert_eq!(fixture.memory.tables(), [legacy]);
}

#[tokio::test]
async fn empty_backend() {
    let fixture = Fixture::new().await;

    let mut conn = fixture.connect().await;
    let report = teardown(&mut conn, &TeardownConfig::default(), None)
        .await
        .unwrap();

    // Only metadata tables, which are dropped outside the rounds
    assert_eq!(report.rounds, 0);
    assert_eq!(report.dropped_schemas, ["stoa"]);
    assert!(fixture.memory.schemas().is_empty());

    // Nothing left to do the second time
    let report = teardown(&mut conn, &TeardownConfig::default(), None)
        .await
        .unwrap();
    assert_eq!(report.rounds, 0);
    assert!(report.dropped_schemas.is_empty());
}
