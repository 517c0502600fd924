use super::Operation;
use crate::schema::db;

#[derive(Debug, Clone, PartialEq)]
pub struct CreateTable {
    pub table: db::Table,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddColumn {
    pub table: db::TableName,
    pub column: db::Column,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DropTable {
    pub name: db::TableName,
}

impl From<CreateTable> for Operation {
    fn from(value: CreateTable) -> Operation {
        Operation::CreateTable(value)
    }
}

impl From<AddColumn> for Operation {
    fn from(value: AddColumn) -> Operation {
        Operation::AddColumn(value)
    }
}

impl From<DropTable> for Operation {
    fn from(value: DropTable) -> Operation {
        Operation::DropTable(value)
    }
}
