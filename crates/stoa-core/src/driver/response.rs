use crate::schema::db::TableName;
use crate::{bail, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Number of rows or objects impacted by the operation
    Count(u64),

    /// Names of user schemas
    Schemas(Vec<String>),

    /// Schema-qualified table names
    Tables(Vec<TableName>),

    /// Metadata rows, one value per column
    Rows(Vec<Vec<String>>),
}

impl Response {
    pub fn count(count: u64) -> Response {
        Response::Count(count)
    }

    pub fn into_schemas(self) -> Result<Vec<String>> {
        match self {
            Response::Schemas(schemas) => Ok(schemas),
            other => bail!("expected schema names, got {other:?}"),
        }
    }

    pub fn into_tables(self) -> Result<Vec<TableName>> {
        match self {
            Response::Tables(tables) => Ok(tables),
            other => bail!("expected table names, got {other:?}"),
        }
    }

    pub fn into_rows(self) -> Result<Vec<Vec<String>>> {
        match self {
            Response::Rows(rows) => Ok(rows),
            other => bail!("expected rows, got {other:?}"),
        }
    }
}
