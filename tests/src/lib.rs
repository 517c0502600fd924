mod exec_log;
pub use exec_log::ExecLog;

mod logging_driver;
pub use logging_driver::LoggingDriver;

use std::{sync::Arc, time::Duration};
use stoa_core::{
    config::SyncConfig,
    driver::{Capability, Driver},
    BackendConnection, SchemaModel, SchemaSync,
};
use stoa_driver_memory::Memory;

/// Routes `tracing` output through the test harness. Set `RUST_LOG` to see
/// it.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A bootstrapped in-memory backend with a model and an executor.
pub struct Fixture {
    pub memory: Memory,
    pub driver: Arc<LoggingDriver>,
    pub model: SchemaModel,
    pub sync: SchemaSync,
}

impl Fixture {
    pub async fn new() -> Fixture {
        Fixture::with_memory(Memory::in_memory()).await
    }

    pub async fn with_capability(capability: Capability) -> Fixture {
        Fixture::with_memory(Memory::with_capability(capability)).await
    }

    pub async fn with_memory(memory: Memory) -> Fixture {
        init_logging();

        let driver = Arc::new(LoggingDriver::new(Box::new(memory.clone())));
        let model = SchemaModel::default();
        let sync = SchemaSync::new(
            model.clone(),
            SyncConfig::default().retry_wait(Duration::from_millis(10)),
        );

        let fixture = Fixture {
            memory,
            driver,
            model,
            sync,
        };

        let mut conn = fixture.connect().await;
        conn.bootstrap().await.unwrap();
        conn.close().await.unwrap();
        fixture.log().clear();

        fixture
    }

    /// Opens a connection whose operations are recorded in [`Fixture::log`].
    pub async fn connect(&self) -> BackendConnection {
        BackendConnection::new(
            self.driver.connect().await.unwrap(),
            self.driver.capability().clone(),
        )
    }

    pub fn log(&self) -> ExecLog {
        self.driver.exec_log()
    }

    /// An executor on the same model with a different retry policy.
    pub fn sync_with(&self, config: SyncConfig) -> SchemaSync {
        SchemaSync::new(self.model.clone(), config)
    }
}
