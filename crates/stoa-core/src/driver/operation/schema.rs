use super::Operation;

#[derive(Debug, Clone, PartialEq)]
pub struct CreateSchema {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DropSchema {
    pub name: String,

    /// Drop contained objects along with the schema
    pub cascade: bool,
}

impl From<CreateSchema> for Operation {
    fn from(value: CreateSchema) -> Operation {
        Operation::CreateSchema(value)
    }
}

impl From<DropSchema> for Operation {
    fn from(value: DropSchema) -> Operation {
        Operation::DropSchema(value)
    }
}
