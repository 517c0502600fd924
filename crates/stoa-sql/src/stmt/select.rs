use super::{Name, Statement};

use stoa_core::schema::MetaTable;

/// Reads all rows of a table.
#[derive(Debug, Clone)]
pub struct Select {
    pub table: Name,
    pub columns: Vec<&'static str>,
}

impl Statement {
    pub fn select_meta(schema: &str, table: MetaTable) -> Statement {
        Select {
            table: Name(vec![schema.to_string(), table.name().to_string()]),
            columns: table.columns().to_vec(),
        }
        .into()
    }
}

impl From<Select> for Statement {
    fn from(value: Select) -> Statement {
        Statement::Select(value)
    }
}
