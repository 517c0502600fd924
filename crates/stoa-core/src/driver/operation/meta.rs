use super::Operation;
use crate::schema::{MetaRow, MetaTable};

#[derive(Debug, Clone, PartialEq)]
pub struct InsertMeta {
    /// The system schema
    pub schema: String,

    pub row: MetaRow,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteMeta {
    pub schema: String,

    pub table: MetaTable,

    /// Column/value pairs that must all match
    pub filter: Vec<(&'static str, String)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectMeta {
    pub schema: String,
    pub table: MetaTable,
}

impl From<InsertMeta> for Operation {
    fn from(value: InsertMeta) -> Operation {
        Operation::InsertMeta(value)
    }
}

impl From<DeleteMeta> for Operation {
    fn from(value: DeleteMeta) -> Operation {
        Operation::DeleteMeta(value)
    }
}

impl From<SelectMeta> for Operation {
    fn from(value: SelectMeta) -> Operation {
        Operation::SelectMeta(value)
    }
}
