use super::{Name, Statement};

use stoa_core::schema::MetaRow;

/// Inserts one row of string values.
#[derive(Debug, Clone)]
pub struct Insert {
    pub table: Name,
    pub columns: Vec<&'static str>,
    pub values: Vec<String>,
}

impl Statement {
    /// Persists a metadata row in the system schema.
    pub fn insert_meta(schema: &str, row: &MetaRow) -> Statement {
        let table = row.table();

        Insert {
            table: Name(vec![schema.to_string(), table.name().to_string()]),
            columns: table.columns().to_vec(),
            values: row.to_values(),
        }
        .into()
    }
}

impl From<Insert> for Statement {
    fn from(value: Insert) -> Statement {
        Statement::Insert(value)
    }
}
