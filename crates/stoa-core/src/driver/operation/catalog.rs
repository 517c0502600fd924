use super::Operation;

#[derive(Debug, Clone, PartialEq)]
pub struct ListSchemas;

#[derive(Debug, Clone, PartialEq)]
pub struct ListTables {
    pub schemas: Vec<String>,
}

impl From<ListSchemas> for Operation {
    fn from(value: ListSchemas) -> Operation {
        Operation::ListSchemas(value)
    }
}

impl From<ListTables> for Operation {
    fn from(value: ListTables) -> Operation {
        Operation::ListTables(value)
    }
}
