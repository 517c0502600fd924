use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};
use stoa::{
    driver::Driver as _,
    lifecycle::{Bundle, State},
    schema::{FieldType, TableRef},
    Config, Server,
};
use stoa_core::{async_trait, err, Result};
use stoa_driver_memory::Memory;
use tests::init_logging;

#[derive(Debug)]
struct Front {
    log: Arc<Mutex<Vec<&'static str>>>,
    fail: bool,
}

impl Front {
    fn new(log: &Arc<Mutex<Vec<&'static str>>>) -> Box<dyn Bundle> {
        Box::new(Front {
            log: log.clone(),
            fail: false,
        })
    }

    fn failing(log: &Arc<Mutex<Vec<&'static str>>>) -> Box<dyn Bundle> {
        Box::new(Front {
            log: log.clone(),
            fail: true,
        })
    }
}

#[async_trait]
impl Bundle for Front {
    fn name(&self) -> &str {
        "front"
    }

    async fn start(&mut self) -> Result<()> {
        self.log.lock().unwrap().push("start front");
        if self.fail {
            return Err(err!("port already in use"));
        }
        Ok(())
    }

    async fn stop(&mut self) -> Result<()> {
        self.log.lock().unwrap().push("stop front");
        Ok(())
    }
}

#[tokio::test]
async fn start_and_shutdown() {
    init_logging();
    let memory = Memory::in_memory();
    let log = Arc::new(Mutex::new(vec![]));

    let server = Server::start_with_driver(
        Config::new(),
        Arc::new(memory.clone()),
        Some(Front::new(&log)),
    )
    .await
    .unwrap();

    assert_eq!(
        server.states(),
        [
            ("backend".to_string(), State::Running),
            ("core".to_string(), State::Running),
            ("front".to_string(), State::Running),
        ]
    );
    assert_eq!(memory.schemas(), ["stoa"]);

    server.shutdown().await.unwrap();
    assert_eq!(*log.lock().unwrap(), ["start front", "stop front"]);
}

#[tokio::test]
async fn failing_front_aborts_start() {
    init_logging();
    let log = Arc::new(Mutex::new(vec![]));

    let err = Server::start_with_driver(
        Config::new(),
        Arc::new(Memory::in_memory()),
        Some(Front::failing(&log)),
    )
    .await
    .unwrap_err();

    assert_eq!(err.to_string(), "port already in use");
    assert_eq!(*log.lock().unwrap(), ["start front"]);
}

#[tokio::test]
async fn unknown_backend_is_rejected() {
    init_logging();
    let config = Config::from_toml_str("[backend]\nurl = \"oracle://localhost/docs\"\n").unwrap();

    let err = Server::start(config, None).await.unwrap_err();
    assert!(err.is_invalid_connection_url());
}

#[tokio::test]
async fn configured_dialect_shapes_identifiers() {
    init_logging();
    let config = Config::from_toml_str(
        r#"
        [backend]
        url = "memory://?dialect=derby"

        [sync]
        max_attempts = 1
        "#,
    )
    .unwrap();

    let server = Server::start(config, None).await.unwrap();
    assert_eq!(server.driver().url(), "memory://?dialect=derby");

    let mut conn = server.connection().await.unwrap();
    let field = server
        .sync()
        .ensure_field(
            &mut conn,
            "shop",
            "orders",
            &TableRef::root(),
            "total",
            FieldType::Double,
        )
        .await
        .unwrap();
    conn.close().await.unwrap();

    let snapshot = server.model().snapshot();
    assert_eq!(snapshot.database("shop").unwrap().identifier, "SHOP");
    assert_eq!(
        snapshot.collection("shop", "orders").unwrap().identifier,
        "ORDERS"
    );
    assert_eq!(field.identifier, "TOTAL_D");

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn model_is_reloaded_on_restart() {
    init_logging();
    let memory = Memory::in_memory();

    let server = Server::start_with_driver(Config::new(), Arc::new(memory.clone()), None)
        .await
        .unwrap();
    let mut conn = server.connection().await.unwrap();
    let sync = server.sync();
    for (path, name, ty) in [
        (TableRef::root(), "name", FieldType::String),
        (TableRef::root(), "name", FieldType::Null),
        (TableRef::from_path(["lines"]), "qty", FieldType::Integer),
    ] {
        sync.ensure_field(&mut conn, "shop", "orders", &path, name, ty)
            .await
            .unwrap();
    }
    conn.close().await.unwrap();

    let rows = server.model().snapshot().to_rows();
    server.shutdown().await.unwrap();

    let server = Server::start_with_driver(Config::new(), Arc::new(memory.clone()), None)
        .await
        .unwrap();
    assert_eq!(server.model().snapshot().to_rows(), rows);

    // Known fields map to their persisted columns without new DDL
    memory.clear_statements();
    let mut conn = server.connection().await.unwrap();
    let field = server
        .sync()
        .ensure_field(
            &mut conn,
            "shop",
            "orders",
            &TableRef::from_path(["lines"]),
            "qty",
            FieldType::Integer,
        )
        .await
        .unwrap();
    assert_eq!(field.identifier, "qty_i");
    assert!(memory.statements().is_empty());

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn reset_db_starts_over() {
    init_logging();
    let memory = Memory::in_memory();
    let server = Server::start_with_driver(Config::new(), Arc::new(memory.clone()), None)
        .await
        .unwrap();

    let mut conn = server.connection().await.unwrap();
    server
        .sync()
        .ensure_doc_part(&mut conn, "shop", "orders", &TableRef::from_path(["lines"]))
        .await
        .unwrap();
    conn.close().await.unwrap();

    let report = server.reset_db().await.unwrap();
    assert_eq!(report.dropped_schemas, ["shop", "stoa"]);

    assert_eq!(memory.schemas(), ["stoa"]);
    assert!(server.model().snapshot().databases().next().is_none());

    // The system schema is usable again
    let mut conn = server.connection().await.unwrap();
    let database = server
        .sync()
        .ensure_database(&mut conn, "shop")
        .await
        .unwrap();
    assert_eq!(database.identifier, "shop");
    conn.close().await.unwrap();

    server.shutdown().await.unwrap();
}
