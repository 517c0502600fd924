mod capability;
pub use capability::{BackendKind, Capability, StorageTypes};

mod identifier;
pub use identifier::{CaseFolding, IdentifierConstraints, SYSTEM_COLUMNS};

pub mod operation;
pub use operation::Operation;

mod response;
pub use response::Response;

mod transaction_manager;
pub use transaction_manager::TransactionManager;

use crate::async_trait;

use std::{borrow::Cow, fmt::Debug};

/// A relational backend the engine can store documents in.
#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// The URL this driver connects to, with credentials removed.
    fn url(&self) -> Cow<'_, str>;

    /// Describes the backend's dialect: identifier rules, storage types and
    /// supported DDL features.
    fn capability(&self) -> &Capability;

    /// Opens a new connection. Each writer owns its connection exclusively.
    async fn connect(&self) -> crate::Result<Box<dyn Connection>>;
}

/// A single backend session.
///
/// Operations run inside the transaction opened by
/// [`operation::Transaction::Start`] until it is committed or rolled back.
/// Failures are reported as backend statement errors classified as
/// retryable or fatal.
#[async_trait]
pub trait Connection: Debug + Send + 'static {
    /// Execute a database operation
    async fn exec(&mut self, op: Operation) -> crate::Result<Response>;

    /// Closes the connection, rolling back any open transaction.
    async fn close(&mut self) -> crate::Result<()> {
        Ok(())
    }
}
