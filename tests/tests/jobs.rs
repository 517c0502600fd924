use pretty_assertions::assert_eq;
use stoa_core::{
    schema::{db::TableName, FieldType, TableRef},
    Job,
};
use tests::Fixture;

fn tables_in(fixture: &Fixture, schema: &str) -> Vec<String> {
    fixture
        .memory
        .tables()
        .into_iter()
        .filter(|table| table.schema == schema)
        .map(|table| table.table)
        .collect()
}

#[tokio::test]
async fn missing_targets_are_rejected() {
    let fixture = Fixture::new().await;
    let mut conn = fixture.connect().await;

    let err = fixture
        .sync
        .run(&mut conn, &Job::add_collection("nope", "orders"))
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert!(!err.is_retryable());

    let err = fixture
        .sync
        .run(
            &mut conn,
            &Job::add_field("nope", "orders", TableRef::root(), "a", FieldType::Long),
        )
        .await
        .unwrap_err();
    assert!(err.is_validation());

    let err = fixture
        .sync
        .run(&mut conn, &Job::drop_database("nope"))
        .await
        .unwrap_err();
    assert!(err.is_validation());

    assert_eq!(fixture.log().ddl_count(), 0);
    assert_eq!(fixture.model.version(), 0);
}

#[tokio::test]
async fn nested_part_requires_its_parent() {
    let fixture = Fixture::new().await;
    let mut conn = fixture.connect().await;

    fixture
        .sync
        .ensure_collection(&mut conn, "shop", "orders")
        .await
        .unwrap();

    let err = fixture
        .sync
        .run(
            &mut conn,
            &Job::add_doc_part("shop", "orders", TableRef::from_path(["items", "tags"])),
        )
        .await
        .unwrap_err();
    assert!(err.is_validation());

    // Only the root table, created with the collection
    assert_eq!(tables_in(&fixture, "shop"), ["orders"]);
}

#[tokio::test]
async fn explicit_identifiers() {
    let fixture = Fixture::new().await;
    let mut conn = fixture.connect().await;

    let snapshot = fixture
        .sync
        .run_batch(
            &mut conn,
            &[
                Job::add_database("Shop").with_identifier("shop_v2"),
                Job::add_collection("Shop", "orders"),
            ],
        )
        .await
        .unwrap();
    assert_eq!(snapshot.database("Shop").unwrap().identifier, "shop_v2");

    // Taken by `orders`
    let err = fixture
        .sync
        .run(
            &mut conn,
            &Job::add_collection("Shop", "invoices").with_identifier("orders"),
        )
        .await
        .unwrap_err();
    assert!(err.is_validation());

    // Not legal for a lowercase-folding backend
    let err = fixture
        .sync
        .run(
            &mut conn,
            &Job::add_collection("Shop", "invoices").with_identifier("Invoices"),
        )
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn nested_parts_reference_their_parent() {
    let fixture = Fixture::new().await;
    let mut conn = fixture.connect().await;

    let tags = fixture
        .sync
        .ensure_doc_part(
            &mut conn,
            "shop",
            "orders",
            &TableRef::from_path(["items", "tags"]),
        )
        .await
        .unwrap();
    assert_eq!(tags.identifier, "orders_items_tags");

    assert_eq!(
        tables_in(&fixture, "shop"),
        ["orders", "orders_items", "orders_items_tags"]
    );
    assert_eq!(
        fixture
            .memory
            .columns(&TableName::new("shop", "orders_items_tags"))
            .unwrap(),
        ["did", "rid", "pid", "seq"]
    );

    let statements = fixture.memory.statements();
    assert!(statements.iter().any(|sql| sql.contains(
        r#"FOREIGN KEY ("pid") REFERENCES "shop"."orders_items" ("rid")"#
    )));
    assert!(statements.iter().any(|sql| sql.contains(
        r#"FOREIGN KEY ("pid") REFERENCES "shop"."orders" ("did")"#
    )));

    // Each nested part hangs off a child field of its parent
    let snapshot = fixture.model.snapshot();
    let root = snapshot
        .doc_part("shop", "orders", &TableRef::root())
        .unwrap();
    assert_eq!(
        root.field("items", FieldType::Child).unwrap().identifier,
        "items_e"
    );
    assert_eq!(
        fixture
            .memory
            .columns(&TableName::new("shop", "orders"))
            .unwrap(),
        ["did", "items_e"]
    );
}

#[tokio::test]
async fn dropping_a_collection_releases_its_identifiers() {
    let fixture = Fixture::new().await;
    let mut conn = fixture.connect().await;

    fixture
        .sync
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
    fixture
        .sync
        .ensure_doc_part(&mut conn, "shop", "customers", &TableRef::root())
        .await
        .unwrap();

    let snapshot = fixture
        .sync
        .run(&mut conn, &Job::drop_collection("shop", "orders"))
        .await
        .unwrap();
    assert!(snapshot.collection("shop", "orders").is_none());
    assert_eq!(tables_in(&fixture, "shop"), ["customers"]);

    // The persisted metadata agrees with the model
    let persisted = conn.load_snapshot().await.unwrap();
    assert_eq!(persisted.to_rows(), snapshot.to_rows());

    let orders = fixture
        .sync
        .ensure_collection(&mut conn, "shop", "orders")
        .await
        .unwrap();
    assert_eq!(orders.identifier, "orders");
}

#[tokio::test]
async fn dropping_a_database_removes_its_schema() {
    let fixture = Fixture::new().await;
    let mut conn = fixture.connect().await;

    fixture
        .sync
        .ensure_doc_part(
            &mut conn,
            "shop",
            "orders",
            &TableRef::from_path(["items"]),
        )
        .await
        .unwrap();
    fixture
        .sync
        .ensure_database(&mut conn, "archive")
        .await
        .unwrap();

    let snapshot = fixture
        .sync
        .run(&mut conn, &Job::drop_database("shop"))
        .await
        .unwrap();

    assert!(snapshot.database("shop").is_none());
    assert_eq!(fixture.memory.schemas(), ["archive", "stoa"]);

    let persisted = conn.load_snapshot().await.unwrap();
    assert_eq!(
        persisted.databases().map(|db| db.name.as_str()).collect::<Vec<_>>(),
        ["archive"]
    );
}
