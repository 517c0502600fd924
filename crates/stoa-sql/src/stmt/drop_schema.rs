use super::Statement;

/// A statement to drop a schema.
#[derive(Debug, Clone)]
pub struct DropSchema {
    pub name: String,

    /// Drop contained objects too. When `false` the backend refuses to drop
    /// a schema that still has tables.
    pub cascade: bool,
}

impl Statement {
    pub fn drop_schema(name: &str, cascade: bool) -> Statement {
        DropSchema {
            name: name.to_string(),
            cascade,
        }
        .into()
    }
}

impl From<DropSchema> for Statement {
    fn from(value: DropSchema) -> Statement {
        Statement::DropSchema(value)
    }
}
