use super::BackendKind;
use crate::{bail, Result};

/// Tracks whether a transaction is open on a connection and produces the
/// dialect's `BEGIN`/`COMMIT`/`ROLLBACK` statements.
///
/// SQL drivers embed one of these and call `start`, `commit`, or `rollback`
/// to obtain the statement to execute against the database.
#[derive(Debug)]
pub struct TransactionManager {
    open: bool,
    begin_stmt: &'static str,
}

impl TransactionManager {
    pub fn new(kind: BackendKind) -> TransactionManager {
        let begin_stmt = match kind {
            BackendKind::Postgresql => "BEGIN",
            BackendKind::Mysql => "START TRANSACTION",
            // Derby connections run with auto-commit off; a transaction
            // begins implicitly with the next statement.
            BackendKind::Derby => "SET ISOLATION SERIALIZABLE",
        };

        TransactionManager {
            open: false,
            begin_stmt,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Returns the SQL that begins a transaction.
    pub fn start(&mut self) -> Result<&'static str> {
        if self.open {
            bail!("a transaction is already open on this connection");
        }
        self.open = true;
        Ok(self.begin_stmt)
    }

    /// Returns the SQL that commits the open transaction.
    pub fn commit(&mut self) -> Result<&'static str> {
        if !self.open {
            bail!("no transaction is open on this connection");
        }
        self.open = false;
        Ok("COMMIT")
    }

    /// Returns the SQL that rolls back the open transaction. The transaction
    /// is considered closed even if the statement then fails.
    pub fn rollback(&mut self) -> Result<&'static str> {
        if !self.open {
            bail!("no transaction is open on this connection");
        }
        self.open = false;
        Ok("ROLLBACK")
    }
}
