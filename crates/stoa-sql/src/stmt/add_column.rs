use super::{ColumnDef, Name, Statement};

use stoa_core::schema::db::{Column, TableName};

/// A statement to add a column to a table.
#[derive(Debug, Clone)]
pub struct AddColumn {
    /// Name of the table to add the column to.
    pub table: Name,

    /// Column definition.
    pub column: ColumnDef,
}

impl Statement {
    /// Adds a column to a table.
    pub fn add_column(table: &TableName, column: &Column) -> Statement {
        AddColumn {
            table: Name::from(table),
            column: ColumnDef::from_schema(column),
        }
        .into()
    }
}

impl From<AddColumn> for Statement {
    fn from(value: AddColumn) -> Statement {
        Statement::AddColumn(value)
    }
}
