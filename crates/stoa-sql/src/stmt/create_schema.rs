use super::Statement;

#[derive(Debug, Clone)]
pub struct CreateSchema {
    pub name: String,
}

impl Statement {
    pub fn create_schema(name: &str) -> Statement {
        CreateSchema {
            name: name.to_string(),
        }
        .into()
    }
}

impl From<CreateSchema> for Statement {
    fn from(value: CreateSchema) -> Statement {
        Statement::CreateSchema(value)
    }
}
