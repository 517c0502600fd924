use super::{Name, Statement};

use stoa_core::schema::MetaTable;

/// Deletes the rows whose columns equal all the given values.
#[derive(Debug, Clone)]
pub struct Delete {
    pub table: Name,
    pub filter: Vec<(&'static str, String)>,
}

impl Statement {
    pub fn delete_meta(schema: &str, table: MetaTable, filter: &[(&'static str, String)]) -> Statement {
        Delete {
            table: Name(vec![schema.to_string(), table.name().to_string()]),
            filter: filter.to_vec(),
        }
        .into()
    }
}

impl From<Delete> for Statement {
    fn from(value: Delete) -> Statement {
        Statement::Delete(value)
    }
}
