use crate::ExecLog;

use std::{
    borrow::Cow,
    sync::{Arc, Mutex},
};
use stoa_core::{
    async_trait,
    driver::{Capability, Connection, Driver, Operation, Response},
    Result,
};

/// A driver wrapper that records every operation its connections execute.
#[derive(Debug)]
pub struct LoggingDriver {
    inner: Box<dyn Driver>,

    /// Shared with every connection handed out
    ops_log: Arc<Mutex<Vec<Operation>>>,
}

impl LoggingDriver {
    pub fn new(driver: Box<dyn Driver>) -> LoggingDriver {
        LoggingDriver {
            inner: driver,
            ops_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn exec_log(&self) -> ExecLog {
        ExecLog::new(self.ops_log.clone())
    }
}

#[async_trait]
impl Driver for LoggingDriver {
    fn url(&self) -> Cow<'_, str> {
        self.inner.url()
    }

    fn capability(&self) -> &Capability {
        self.inner.capability()
    }

    async fn connect(&self) -> Result<Box<dyn Connection>> {
        Ok(Box::new(LoggingConnection {
            inner: self.inner.connect().await?,
            ops_log: self.ops_log.clone(),
        }))
    }
}

#[derive(Debug)]
struct LoggingConnection {
    inner: Box<dyn Connection>,
    ops_log: Arc<Mutex<Vec<Operation>>>,
}

#[async_trait]
impl Connection for LoggingConnection {
    async fn exec(&mut self, operation: Operation) -> Result<Response> {
        self.ops_log
            .lock()
            .expect("Failed to acquire ops log lock")
            .push(operation.clone());

        self.inner.exec(operation).await
    }

    async fn close(&mut self) -> Result<()> {
        self.inner.close().await
    }
}
