use pretty_assertions::assert_eq;
use stoa_core::{
    driver::{Capability, IdentifierConstraints},
    schema::{db::TableName, FieldType, TableRef},
};
use tests::Fixture;

fn short_identifiers(max_length: usize) -> Capability {
    Capability {
        identifier: IdentifierConstraints {
            max_length,
            ..IdentifierConstraints::POSTGRESQL
        },
        ..Capability::POSTGRESQL
    }
}

#[tokio::test]
async fn long_names_sharing_a_prefix_stay_distinct() {
    let fixture = Fixture::with_capability(short_identifiers(9)).await;
    let mut conn = fixture.connect().await;

    let europe = fixture
        .sync
        .ensure_doc_part(&mut conn, "shop", "orders_europe", &TableRef::root())
        .await
        .unwrap();
    let eu_west = fixture
        .sync
        .ensure_doc_part(&mut conn, "shop", "orders_eu_west", &TableRef::root())
        .await
        .unwrap();

    assert_eq!(europe.identifier, "orders_e1");
    assert_eq!(eu_west.identifier, "orders_e2");

    let tables = fixture
        .memory
        .tables()
        .into_iter()
        .filter(|table| table.schema == "shop")
        .collect::<Vec<_>>();
    assert_eq!(
        tables,
        [
            TableName::new("shop", "orders_e1"),
            TableName::new("shop", "orders_e2")
        ]
    );

    // Physical names trace back to logical ones
    let snapshot = fixture.model.snapshot();
    let shop = snapshot.database_by_identifier("shop").unwrap();
    assert_eq!(shop.name, "shop");
    assert_eq!(
        shop.collection_by_identifier("orders_e2").unwrap().name,
        "orders_eu_west"
    );
}

#[tokio::test]
async fn reserved_and_illegal_names_are_rewritten() {
    let fixture = Fixture::new().await;
    let mut conn = fixture.connect().await;

    let select = fixture
        .sync
        .ensure_database(&mut conn, "select")
        .await
        .unwrap();
    assert_eq!(select.identifier, "select1");

    let collection = fixture
        .sync
        .ensure_collection(&mut conn, "select", "Order Lines")
        .await
        .unwrap();
    assert_eq!(collection.identifier, "order_lines");

    let field = fixture
        .sync
        .ensure_field(
            &mut conn,
            "select",
            "Order Lines",
            &TableRef::root(),
            "2nd-address",
            FieldType::String,
        )
        .await
        .unwrap();
    assert_eq!(field.identifier, "_2nd_address_s");

    assert!(fixture.memory.schemas().contains(&"select1".to_string()));
}

#[tokio::test]
async fn one_name_with_two_types_maps_to_two_columns() {
    let fixture = Fixture::new().await;
    let mut conn = fixture.connect().await;

    for ty in [FieldType::Integer, FieldType::String] {
        fixture
            .sync
            .ensure_field(&mut conn, "shop", "people", &TableRef::root(), "age", ty)
            .await
            .unwrap();
    }

    assert_eq!(
        fixture
            .memory
            .columns(&TableName::new("shop", "people"))
            .unwrap(),
        ["did", "age_i", "age_s"]
    );

    let snapshot = fixture.model.snapshot();
    let root = snapshot
        .doc_part("shop", "people", &TableRef::root())
        .unwrap();
    assert_eq!(root.field_by_identifier("age_s").unwrap().ty, FieldType::String);
    assert_eq!(root.fields_named("age").count(), 2);
}

#[tokio::test]
async fn known_entities_reuse_their_mapping() {
    let fixture = Fixture::new().await;
    let mut conn = fixture.connect().await;
    let items = TableRef::from_path(["items"]);

    let first = fixture
        .sync
        .ensure_field(&mut conn, "shop", "orders", &items, "sku", FieldType::String)
        .await
        .unwrap();
    let version = fixture.model.version();
    assert!(fixture.log().ddl_count() > 0);

    fixture.log().clear();
    let second = fixture
        .sync
        .ensure_field(&mut conn, "shop", "orders", &items, "sku", FieldType::String)
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(fixture.model.version(), version);
    assert!(fixture.log().is_empty());
}
