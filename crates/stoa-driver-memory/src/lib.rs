//! An in-memory backend.
//!
//! The memory driver keeps a catalog of schemas, tables and metadata rows
//! and reproduces the behavior of a transactional SQL backend that matters
//! to schema synchronization: each connection stages its statements in a
//! private copy of the catalog, and commit replays them against the shared
//! catalog, so two writers creating the same object conflict at commit just
//! as they would on a real backend. Every statement is also rendered with
//! the dialect's serializer and recorded.

mod catalog;
use catalog::Catalog;

mod connection;
pub use connection::Connection;

mod failure;

use std::{
    borrow::Cow,
    sync::{Arc, Mutex, MutexGuard},
};
use stoa_core::{
    async_trait,
    driver::{BackendKind, Capability, Driver},
    schema::db::TableName,
    Error, Result,
};
use url::Url;

#[derive(Debug, Clone)]
pub struct Memory {
    capability: Capability,
    shared: Arc<Shared>,
}

#[derive(Debug, Default)]
struct Shared {
    /// Committed state
    catalog: Mutex<Catalog>,

    faults: Mutex<Faults>,

    /// SQL of every statement executed, in order
    statements: Mutex<Vec<String>>,
}

#[derive(Debug, Default)]
struct Faults {
    /// Number of upcoming statements that fail with a retryable error
    transient: usize,

    /// Whether the next rollback fails
    rollback: bool,
}

impl Memory {
    /// Creates a memory backend from a `memory://` URL. The optional
    /// `dialect` query parameter selects the dialect profile to emulate
    /// (`postgresql`, `mysql` or `derby`); PostgreSQL is the default.
    pub fn new(url: impl Into<String>) -> Result<Memory> {
        let url_str = url.into();
        let url = Url::parse(&url_str).map_err(|err| {
            Error::invalid_connection_url(format!("{err}; url={url_str}"))
        })?;

        if url.scheme() != "memory" {
            return Err(Error::invalid_connection_url(format!(
                "connection URL does not have a `memory` scheme; url={url_str}"
            )));
        }

        let mut kind = BackendKind::Postgresql;
        for (key, value) in url.query_pairs() {
            match (&*key, &*value) {
                ("dialect", "postgresql") => kind = BackendKind::Postgresql,
                ("dialect", "mysql") => kind = BackendKind::Mysql,
                ("dialect", "derby") => kind = BackendKind::Derby,
                _ => {
                    return Err(Error::invalid_connection_url(format!(
                        "unsupported parameter `{key}={value}`; url={url_str}"
                    )))
                }
            }
        }

        Ok(Memory::with_kind(kind))
    }

    /// An empty backend emulating PostgreSQL.
    pub fn in_memory() -> Memory {
        Memory::with_kind(BackendKind::Postgresql)
    }

    pub fn with_kind(kind: BackendKind) -> Memory {
        Memory::with_capability(Capability::for_kind(kind))
    }

    /// An empty backend with a custom dialect profile, for example one with
    /// a shorter identifier limit.
    pub fn with_capability(capability: Capability) -> Memory {
        Memory {
            capability,
            shared: Arc::default(),
        }
    }

    /// Makes the next `count` statements fail with a retryable error.
    pub fn fail_next_statements(&self, count: usize) {
        lock(&self.shared.faults).transient = count;
    }

    /// Makes the next rollback fail.
    pub fn fail_next_rollback(&self) {
        lock(&self.shared.faults).rollback = true;
    }

    /// Makes every attempt to drop `table` fail.
    pub fn deny_drop(&self, table: TableName) {
        lock(&self.shared.catalog).deny_drop(table);
    }

    /// Creates a table outside the engine, committed immediately.
    pub fn create_unmanaged_table(&self, table: &TableName) {
        lock(&self.shared.catalog).create_unmanaged_table(table);
    }

    /// Adds a foreign key from `from` to `to` between existing tables.
    pub fn add_foreign_key(&self, from: &TableName, to: &TableName) -> Result<()> {
        lock(&self.shared.catalog)
            .add_foreign_key(from, to)
            .map_err(|failure| failure.into_error(format!("add foreign key to `{from}`")))
    }

    /// Committed schemas.
    pub fn schemas(&self) -> Vec<String> {
        lock(&self.shared.catalog).schema_names()
    }

    /// Committed tables.
    pub fn tables(&self) -> Vec<TableName> {
        lock(&self.shared.catalog).table_names()
    }

    /// Committed columns of a table, in creation order.
    pub fn columns(&self, table: &TableName) -> Option<Vec<String>> {
        lock(&self.shared.catalog).columns(table)
    }

    /// SQL of the statements executed so far.
    pub fn statements(&self) -> Vec<String> {
        lock(&self.shared.statements).clone()
    }

    pub fn clear_statements(&self) {
        lock(&self.shared.statements).clear();
    }
}

impl Default for Memory {
    fn default() -> Memory {
        Memory::in_memory()
    }
}

#[async_trait]
impl Driver for Memory {
    fn url(&self) -> Cow<'_, str> {
        match self.capability.kind {
            BackendKind::Postgresql => Cow::Borrowed("memory://"),
            kind => Cow::Owned(format!("memory://?dialect={}", kind.name())),
        }
    }

    fn capability(&self) -> &Capability {
        &self.capability
    }

    async fn connect(&self) -> Result<Box<dyn stoa_core::Connection>> {
        Ok(Box::new(Connection::new(
            self.capability.kind,
            self.shared.clone(),
        )))
    }
}

/// The state behind the mutexes stays consistent at every await point, so a
/// poisoned lock is still usable.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
