use crate::{driver, Result};

use std::sync::Arc;
use stoa_core::{
    driver::Driver,
    lifecycle::{BackendBundle, Bundle, BundleStack, CoreBundle, State},
    teardown::{self, TeardownReport},
    BackendConnection, Config, SchemaModel, SchemaSync,
};
use tracing::info;

/// A running engine.
///
/// Starting a server brings up the backend bundle, then the core bundle that
/// loads the schema model from the backend, then the caller's front bundle.
/// Shutdown stops them in reverse.
#[derive(Debug)]
pub struct Server {
    config: Config,
    driver: Arc<dyn Driver>,
    model: SchemaModel,
    stack: BundleStack,
}

impl Server {
    /// Starts a server for the backend named by `config.backend.url`.
    pub async fn start(config: Config, front: Option<Box<dyn Bundle>>) -> Result<Server> {
        let driver = driver::connect(&config.backend.url)?;
        Server::start_with_driver(config, driver, front).await
    }

    /// Starts a server on an existing driver.
    pub async fn start_with_driver(
        config: Config,
        driver: Arc<dyn Driver>,
        front: Option<Box<dyn Bundle>>,
    ) -> Result<Server> {
        let model = SchemaModel::default();

        let mut stack = BundleStack::new(config.lifecycle.boot_timeout_duration());
        stack.push(BackendBundle::new(driver.clone()));
        stack.push(CoreBundle::new(driver.clone(), model.clone()));
        if let Some(front) = front {
            stack.push_boxed(front);
        }

        stack.start().await?;
        info!(url = %driver.url(), version = model.version(), "server started");

        Ok(Server {
            config,
            driver,
            model,
            stack,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn driver(&self) -> &Arc<dyn Driver> {
        &self.driver
    }

    pub fn model(&self) -> &SchemaModel {
        &self.model
    }

    /// Bundle states, in start order.
    pub fn states(&self) -> Vec<(String, State)> {
        self.stack.states()
    }

    /// Opens a connection for a writer.
    pub async fn connection(&self) -> Result<BackendConnection> {
        Ok(BackendConnection::new(
            self.driver.connect().await?,
            self.driver.capability().clone(),
        ))
    }

    /// An executor publishing to this server's model.
    pub fn sync(&self) -> SchemaSync {
        SchemaSync::new(self.model.clone(), self.config.sync.clone())
    }

    /// Removes every table and schema the engine owns, then recreates the
    /// system schema. The model is reset to an empty snapshot.
    pub async fn reset_db(&self) -> Result<TeardownReport> {
        let mut conn = self.connection().await?;

        let report = teardown::teardown(&mut conn, &self.config.teardown, Some(&self.model)).await?;
        conn.bootstrap().await?;
        conn.close().await?;

        Ok(report)
    }

    /// Stops all bundles in reverse start order.
    pub async fn shutdown(mut self) -> Result<()> {
        self.stack.shutdown().await?;
        info!("server stopped");
        Ok(())
    }
}

#[cfg(all(test, feature = "memory"))]
mod tests {
    use super::*;
    use stoa_core::schema::{FieldType, TableRef};

    #[tokio::test]
    async fn sync_then_reset() {
        let server = Server::start(Config::default(), None).await.unwrap();
        assert_eq!(
            server.states(),
            [
                ("backend".to_string(), State::Running),
                ("core".to_string(), State::Running),
            ]
        );

        let mut conn = server.connection().await.unwrap();
        let field = server
            .sync()
            .ensure_field(
                &mut conn,
                "shop",
                "orders",
                &TableRef::root(),
                "name",
                FieldType::String,
            )
            .await
            .unwrap();
        assert_eq!(field.identifier, "name_s");
        conn.close().await.unwrap();
        assert!(server.model().version() > 0);

        let report = server.reset_db().await.unwrap();
        assert_eq!(report.dropped_schemas, ["shop", "stoa"]);
        assert!(server.model().snapshot().databases().next().is_none());

        // The system schema is back, so the backend can be loaded again
        let mut conn = server.connection().await.unwrap();
        let persisted = conn.load_snapshot().await.unwrap();
        assert!(persisted.databases().next().is_none());
        conn.close().await.unwrap();

        server.shutdown().await.unwrap();
    }
}
