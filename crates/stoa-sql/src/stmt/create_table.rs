use super::{ColumnDef, Name, Statement};

use stoa_core::schema::db::Table;

#[derive(Debug, Clone)]
pub struct CreateTable {
    /// Name of the table
    pub name: Name,

    /// Column definitions
    pub columns: Vec<ColumnDef>,

    /// Primary key columns
    pub primary_key: Vec<String>,

    pub foreign_key: Option<ForeignKeyDef>,
}

#[derive(Debug, Clone)]
pub struct ForeignKeyDef {
    pub columns: Vec<String>,
    pub references: Name,
    pub referenced_columns: Vec<String>,
}

impl Statement {
    pub fn create_table(table: &Table) -> Statement {
        CreateTable {
            name: Name::from(&table.name),
            columns: table.columns.iter().map(ColumnDef::from_schema).collect(),
            primary_key: table.primary_key.clone(),
            foreign_key: table.foreign_key.as_ref().map(|fk| ForeignKeyDef {
                columns: fk.columns.clone(),
                references: Name::from(&fk.references),
                referenced_columns: fk.referenced_columns.clone(),
            }),
        }
        .into()
    }
}

impl From<CreateTable> for Statement {
    fn from(value: CreateTable) -> Statement {
        Statement::CreateTable(value)
    }
}
