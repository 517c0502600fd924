use super::Bundle;
use crate::{async_trait, driver::Driver, BackendConnection, Result};

use std::sync::Arc;
use tracing::info;

/// Checks the backend is reachable and creates the system schema.
///
/// Holds a connection open while running; it is closed on stop.
#[derive(Debug)]
pub struct BackendBundle {
    driver: Arc<dyn Driver>,
    conn: Option<BackendConnection>,
}

impl BackendBundle {
    pub fn new(driver: Arc<dyn Driver>) -> BackendBundle {
        BackendBundle { driver, conn: None }
    }
}

#[async_trait]
impl Bundle for BackendBundle {
    fn name(&self) -> &str {
        "backend"
    }

    async fn start(&mut self) -> Result<()> {
        let mut conn = BackendConnection::new(
            self.driver.connect().await?,
            self.driver.capability().clone(),
        );
        conn.bootstrap().await?;

        info!(
            url = %self.driver.url(),
            kind = %self.driver.capability().kind,
            "backend ready"
        );
        self.conn = Some(conn);
        Ok(())
    }

    async fn stop(&mut self) -> Result<()> {
        match self.conn.take() {
            Some(conn) => conn.close().await,
            None => Ok(()),
        }
    }
}
