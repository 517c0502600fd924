mod catalog;
pub use catalog::{ListSchemas, ListTables};

mod meta;
pub use meta::{DeleteMeta, InsertMeta, SelectMeta};

mod schema;
pub use schema::{CreateSchema, DropSchema};

mod table;
pub use table::{AddColumn, CreateTable, DropTable};

mod transaction;
pub use transaction::Transaction;

/// A physical operation executed by a [`Connection`](super::Connection).
///
/// Operations carry physical names only. Logical names never reach the
/// backend except as values of metadata rows.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Create a schema holding one database's tables
    CreateSchema(CreateSchema),

    /// Drop a schema, with or without its contents
    DropSchema(DropSchema),

    /// Create a document part table
    CreateTable(CreateTable),

    /// Add a field column to a document part table
    AddColumn(AddColumn),

    DropTable(DropTable),

    /// Persist a metadata row in the system schema
    InsertMeta(InsertMeta),

    /// Remove metadata rows matching a filter
    DeleteMeta(DeleteMeta),

    /// Read all rows of a metadata table
    SelectMeta(SelectMeta),

    /// Enumerate the backend's user schemas
    ListSchemas(ListSchemas),

    /// Enumerate the tables of the given schemas
    ListTables(ListTables),

    /// Execute a transaction lifecycle op
    Transaction(Transaction),
}

impl Operation {
    /// A description of what the operation does, used in error messages in
    /// place of the statement text.
    pub fn intent(&self) -> String {
        match self {
            Operation::CreateSchema(op) => format!("create schema `{}`", op.name),
            Operation::DropSchema(op) => format!("drop schema `{}`", op.name),
            Operation::CreateTable(op) => format!("create table `{}`", op.table.name),
            Operation::AddColumn(op) => {
                format!("add column `{}` to `{}`", op.column.name, op.table)
            }
            Operation::DropTable(op) => format!("drop table `{}`", op.name),
            Operation::InsertMeta(op) => format!(
                "insert metadata into `{}.{}`",
                op.schema,
                op.row.table().name()
            ),
            Operation::DeleteMeta(op) => {
                format!("delete metadata from `{}.{}`", op.schema, op.table.name())
            }
            Operation::SelectMeta(op) => {
                format!("read metadata from `{}.{}`", op.schema, op.table.name())
            }
            Operation::ListSchemas(_) => "list schemas".to_string(),
            Operation::ListTables(_) => "list tables".to_string(),
            Operation::Transaction(op) => format!("{op:?} transaction").to_lowercase(),
        }
    }

    pub fn is_transaction(&self) -> bool {
        matches!(self, Operation::Transaction(_))
    }
}
