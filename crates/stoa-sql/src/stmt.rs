mod add_column;
pub use add_column::AddColumn;

mod catalog;
pub use catalog::{ListSchemas, ListTables};

mod column_def;
pub use column_def::ColumnDef;

mod create_schema;
pub use create_schema::CreateSchema;

mod create_table;
pub use create_table::{CreateTable, ForeignKeyDef};

mod delete;
pub use delete::Delete;

mod drop_schema;
pub use drop_schema::DropSchema;

mod drop_table;
pub use drop_table::DropTable;

mod insert;
pub use insert::Insert;

mod name;
pub use name::Name;

mod select;
pub use select::Select;

use stoa_core::driver::Operation;

#[derive(Debug, Clone)]
pub enum Statement {
    AddColumn(AddColumn),
    CreateSchema(CreateSchema),
    CreateTable(CreateTable),
    Delete(Delete),
    DropSchema(DropSchema),
    DropTable(DropTable),
    Insert(Insert),
    ListSchemas(ListSchemas),
    ListTables(ListTables),
    Select(Select),
}

impl Statement {
    /// Builds the statement performing a driver operation. Transaction
    /// lifecycle operations have no statement form and return `None`.
    pub fn from_operation(op: &Operation) -> Option<Statement> {
        Some(match op {
            Operation::CreateSchema(op) => Statement::create_schema(&op.name),
            Operation::DropSchema(op) => Statement::drop_schema(&op.name, op.cascade),
            Operation::CreateTable(op) => Statement::create_table(&op.table),
            Operation::AddColumn(op) => Statement::add_column(&op.table, &op.column),
            Operation::DropTable(op) => Statement::drop_table(&op.name),
            Operation::InsertMeta(op) => Statement::insert_meta(&op.schema, &op.row),
            Operation::DeleteMeta(op) => Statement::delete_meta(&op.schema, op.table, &op.filter),
            Operation::SelectMeta(op) => Statement::select_meta(&op.schema, op.table),
            Operation::ListSchemas(_) => Statement::list_schemas(),
            Operation::ListTables(op) => Statement::list_tables(&op.schemas),
            Operation::Transaction(_) => return None,
        })
    }

    /// Returns `true` if the statement produces rows.
    pub fn is_query(&self) -> bool {
        matches!(
            self,
            Statement::ListSchemas(_) | Statement::ListTables(_) | Statement::Select(_)
        )
    }
}
