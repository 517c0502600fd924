use super::Type;

use std::fmt;

/// A schema-qualified table name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableName {
    pub schema: String,
    pub table: String,
}

impl TableName {
    pub fn new(schema: impl Into<String>, table: impl Into<String>) -> TableName {
        TableName {
            schema: schema.into(),
            table: table.into(),
        }
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.table)
    }
}

/// A database table
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: TableName,

    /// The table's columns, system columns first
    pub columns: Vec<Column>,

    /// Names of the primary key columns
    pub primary_key: Vec<String>,

    /// Reference to the parent document part's table, for nested parts on
    /// backends that enforce foreign keys.
    pub foreign_key: Option<ForeignKey>,
}

impl Table {
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,

    /// Storage type of the column
    pub ty: Type,

    pub nullable: bool,
}

impl Column {
    pub fn new(name: impl Into<String>, ty: Type, nullable: bool) -> Column {
        Column {
            name: name.into(),
            ty,
            nullable,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    pub columns: Vec<String>,
    pub references: TableName,
    pub referenced_columns: Vec<String>,
}
