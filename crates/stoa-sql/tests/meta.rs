use pretty_assertions::assert_eq;
use stoa_core::{
    driver::operation::{DeleteMeta, InsertMeta, ListSchemas, ListTables, Transaction},
    driver::Operation,
    schema::{MetaRow, MetaTable},
};
use stoa_sql::{Serializer, Statement};

fn serialize(serializer: Serializer, op: impl Into<Operation>) -> (String, Vec<String>) {
    let stmt = Statement::from_operation(&op.into()).unwrap();
    let mut params = vec![];
    let sql = serializer.serialize(&stmt, &mut params);
    (sql, params)
}

#[test]
fn insert_binds_values() {
    let op = InsertMeta {
        schema: "stoa".into(),
        row: MetaRow::Database {
            name: "shop".into(),
            identifier: "shop".into(),
        },
    };

    let (sql, params) = serialize(Serializer::postgresql(), op.clone());
    assert_eq!(
        sql,
        r#"INSERT INTO "stoa"."database" ("name", "identifier") VALUES ($1, $2);"#
    );
    assert_eq!(params, ["shop", "shop"]);

    let (sql, _) = serialize(Serializer::mysql(), op);
    assert_eq!(
        sql,
        "INSERT INTO `stoa`.`database` (`name`, `identifier`) VALUES (?, ?);"
    );
}

#[test]
fn delete_filters_on_every_pair() {
    let op = DeleteMeta {
        schema: "stoa".into(),
        table: MetaTable::Field,
        filter: vec![
            ("database", "shop".into()),
            ("collection", "orders".into()),
        ],
    };

    let (sql, params) = serialize(Serializer::postgresql(), op);
    assert_eq!(
        sql,
        r#"DELETE FROM "stoa"."field" WHERE "database" = $1 AND "collection" = $2;"#
    );
    assert_eq!(params, ["shop", "orders"]);
}

#[test]
fn select_reads_columns_in_order() {
    let stmt = Statement::select_meta("STOA", MetaTable::DocPart);
    let sql = Serializer::derby().serialize(&stmt, &mut Vec::<String>::new());

    assert_eq!(
        sql,
        r#"SELECT "database", "collection", "table_ref", "identifier" FROM "STOA"."doc_part";"#
    );
}

#[test]
fn list_tables_binds_schemas() {
    let op = ListTables {
        schemas: vec!["shop".into(), "stoa".into()],
    };

    let (sql, params) = serialize(Serializer::postgresql(), op.clone());
    assert!(sql.ends_with("AND table_schema::text IN ($1, $2);"), "{sql}");
    assert_eq!(params, ["shop", "stoa"]);

    let (sql, _) = serialize(Serializer::derby(), op);
    assert!(sql.ends_with("AND s.schemaname IN (?, ?);"), "{sql}");

    let (sql, params) = serialize(Serializer::mysql(), ListTables { schemas: vec![] });
    assert!(sql.ends_with("AND 1 = 0;"), "{sql}");
    assert!(params.is_empty());
}

#[test]
fn list_schemas_excludes_system_schemas() {
    let (sql, _) = serialize(Serializer::mysql(), ListSchemas);
    assert!(sql.contains("'performance_schema'"), "{sql}");

    let (sql, _) = serialize(Serializer::postgresql(), ListSchemas);
    assert!(sql.contains("'information_schema'"), "{sql}");
}

#[test]
fn transactions_have_no_statement() {
    assert!(Statement::from_operation(&Transaction::Start.into()).is_none());
    assert!(Statement::from_operation(&ListSchemas.into())
        .unwrap()
        .is_query());
}
