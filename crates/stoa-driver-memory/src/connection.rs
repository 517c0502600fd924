use crate::{failure::Failure, lock, Catalog, Shared};

use std::sync::Arc;
use stoa_core::{
    async_trait,
    driver::{operation::Transaction, BackendKind, Operation, Response, TransactionManager},
    Result,
};
use stoa_sql as sql;
use tracing::debug;

#[derive(Debug)]
pub struct Connection {
    shared: Arc<Shared>,
    serializer: sql::Serializer,
    transaction_manager: TransactionManager,

    /// Open transaction, if any
    staged: Option<Staged>,
}

/// Statements run since the transaction started, and the catalog they
/// produced.
#[derive(Debug)]
struct Staged {
    catalog: Catalog,
    log: Vec<Operation>,
}

impl Connection {
    pub(crate) fn new(kind: BackendKind, shared: Arc<Shared>) -> Connection {
        Connection {
            shared,
            serializer: sql::Serializer::for_kind(kind),
            transaction_manager: TransactionManager::new(kind),
            staged: None,
        }
    }

    fn record(&self, sql: impl Into<String>) {
        lock(&self.shared.statements).push(sql.into());
    }

    fn start(&mut self) -> Result<Response> {
        let sql = self.transaction_manager.start()?;
        self.record(sql);

        self.staged = Some(Staged {
            catalog: lock(&self.shared.catalog).clone(),
            log: vec![],
        });
        Ok(Response::count(0))
    }

    /// Replays the transaction's statements against the committed catalog.
    /// A statement that no longer applies, typically because another
    /// connection committed the same object first, fails the commit.
    fn commit(&mut self) -> Result<Response> {
        let sql = self.transaction_manager.commit()?;
        self.record(sql);

        let Some(staged) = self.staged.take() else {
            return Ok(Response::count(0));
        };

        let mut catalog = lock(&self.shared.catalog);
        let mut next = catalog.clone();

        for op in &staged.log {
            if let Err(failure) = next.apply(op) {
                debug!(intent = %op.intent(), error = %failure, "commit conflict");
                return Err(failure.into_error(op.intent()));
            }
        }

        *catalog = next;
        Ok(Response::count(0))
    }

    fn rollback(&mut self) -> Result<Response> {
        let sql = self.transaction_manager.rollback()?;
        self.record(sql);
        self.staged = None;

        let failed = std::mem::take(&mut lock(&self.shared.faults).rollback);
        if failed {
            return Err(Failure::fatal("connection lost during rollback").into_error("rollback"));
        }
        Ok(Response::count(0))
    }

    fn statement(&mut self, op: Operation) -> Result<Response> {
        let intent = op.intent();

        if let Some(stmt) = sql::Statement::from_operation(&op) {
            let mut params = Vec::<String>::new();
            let sql = self.serializer.serialize(&stmt, &mut params);
            self.record(sql);
        }

        {
            let mut faults = lock(&self.shared.faults);
            if faults.transient > 0 {
                faults.transient -= 1;
                return Err(Failure::retryable(
                    "could not serialize access due to concurrent update",
                )
                .into_error(intent));
            }
        }

        match &mut self.staged {
            Some(staged) => {
                let response = staged
                    .catalog
                    .apply(&op)
                    .map_err(|failure| failure.into_error(intent))?;
                staged.log.push(op);
                Ok(response)
            }
            // Outside a transaction each statement commits on its own
            None => lock(&self.shared.catalog)
                .apply(&op)
                .map_err(|failure| failure.into_error(intent)),
        }
    }
}

#[async_trait]
impl stoa_core::Connection for Connection {
    async fn exec(&mut self, op: Operation) -> Result<Response> {
        match op {
            Operation::Transaction(Transaction::Start) => self.start(),
            Operation::Transaction(Transaction::Commit) => self.commit(),
            Operation::Transaction(Transaction::Rollback) => self.rollback(),
            op => self.statement(op),
        }
    }

    async fn close(&mut self) -> Result<()> {
        if self.transaction_manager.is_open() {
            self.rollback()?;
        }
        Ok(())
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        if self.staged.is_some() {
            debug!("connection dropped with an open transaction; rolling back");
        }
    }
}
