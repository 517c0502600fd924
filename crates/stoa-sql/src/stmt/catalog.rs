use super::Statement;

/// Lists user schemas, excluding the backend's own.
#[derive(Debug, Clone)]
pub struct ListSchemas;

/// Lists the base tables of the given schemas as `(schema, table)` rows.
#[derive(Debug, Clone)]
pub struct ListTables {
    pub schemas: Vec<String>,
}

impl Statement {
    pub fn list_schemas() -> Statement {
        Statement::ListSchemas(ListSchemas)
    }

    pub fn list_tables(schemas: &[String]) -> Statement {
        Statement::ListTables(ListTables {
            schemas: schemas.to_vec(),
        })
    }
}
