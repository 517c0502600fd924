use std::sync::{Arc, Mutex};
use stoa_core::driver::{operation::Transaction, Operation};

/// A view of the operations recorded by a [`LoggingDriver`].
///
/// [`LoggingDriver`]: crate::LoggingDriver
pub struct ExecLog {
    ops: Arc<Mutex<Vec<Operation>>>,
}

impl ExecLog {
    pub(crate) fn new(ops: Arc<Mutex<Vec<Operation>>>) -> ExecLog {
        ExecLog { ops }
    }

    pub fn len(&self) -> usize {
        self.ops.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.lock().unwrap().is_empty()
    }

    /// Count operations matching the given predicate
    pub fn count<F>(&self, predicate: F) -> usize
    where
        F: Fn(&Operation) -> bool,
    {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .filter(|op| predicate(op))
            .count()
    }

    /// Number of DDL statements: schemas and tables created, altered or
    /// dropped.
    pub fn ddl_count(&self) -> usize {
        self.count(|op| {
            matches!(
                op,
                Operation::CreateSchema(_)
                    | Operation::DropSchema(_)
                    | Operation::CreateTable(_)
                    | Operation::AddColumn(_)
                    | Operation::DropTable(_)
            )
        })
    }

    pub fn rollbacks(&self) -> usize {
        self.count(|op| matches!(op, Operation::Transaction(Transaction::Rollback)))
    }

    /// Logical intents of the recorded operations, transaction control
    /// excluded.
    pub fn intents(&self) -> Vec<String> {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .filter(|op| !op.is_transaction())
            .map(Operation::intent)
            .collect()
    }

    pub fn clear(&self) {
        self.ops.lock().unwrap().clear();
    }
}
