use super::Bundle;
use crate::{async_trait, driver::Driver, BackendConnection, Result, SchemaModel};

use std::sync::Arc;
use tracing::info;

/// Loads the persisted schema metadata into the shared model.
#[derive(Debug)]
pub struct CoreBundle {
    driver: Arc<dyn Driver>,
    model: SchemaModel,
}

impl CoreBundle {
    pub fn new(driver: Arc<dyn Driver>, model: SchemaModel) -> CoreBundle {
        CoreBundle { driver, model }
    }
}

#[async_trait]
impl Bundle for CoreBundle {
    fn name(&self) -> &str {
        "core"
    }

    async fn start(&mut self) -> Result<()> {
        let mut conn = BackendConnection::new(
            self.driver.connect().await?,
            self.driver.capability().clone(),
        );
        let snapshot = conn.load_snapshot().await?;
        conn.close().await?;

        let snapshot = self.model.replace(snapshot);
        info!(
            version = snapshot.version(),
            databases = snapshot.databases().count(),
            "schema model loaded"
        );
        Ok(())
    }

    async fn stop(&mut self) -> Result<()> {
        Ok(())
    }
}
