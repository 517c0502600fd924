use super::{Name, Statement};

use stoa_core::schema::db::TableName;

/// A statement to drop a SQL table.
#[derive(Debug, Clone)]
pub struct DropTable {
    /// Name of the table.
    pub name: Name,
}

impl Statement {
    pub fn drop_table(name: &TableName) -> Statement {
        DropTable {
            name: Name::from(name),
        }
        .into()
    }
}

impl From<DropTable> for Statement {
    fn from(value: DropTable) -> Statement {
        Statement::DropTable(value)
    }
}
