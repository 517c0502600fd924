use super::{FieldType, MetaField, TableRef};

use indexmap::IndexMap;

/// One nesting level of a collection's documents, stored in one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaDocPart {
    pub table_ref: TableRef,

    /// Name of the table in the backend
    pub identifier: String,

    /// Fields in the order they were discovered
    fields: IndexMap<(String, FieldType), MetaField>,
}

impl MetaDocPart {
    pub fn new(table_ref: TableRef, identifier: impl Into<String>) -> MetaDocPart {
        MetaDocPart {
            table_ref,
            identifier: identifier.into(),
            fields: IndexMap::new(),
        }
    }

    /// The part this one is nested in; `None` for the root part.
    pub fn parent(&self) -> Option<TableRef> {
        self.table_ref.parent()
    }

    pub fn field(&self, name: &str, ty: FieldType) -> Option<&MetaField> {
        self.fields.get(&(name.to_string(), ty))
    }

    /// All fields with the given name, one per observed type.
    pub fn fields_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a MetaField> + 'a {
        self.fields.values().filter(move |field| field.name == name)
    }

    pub fn field_by_identifier(&self, identifier: &str) -> Option<&MetaField> {
        self.fields
            .values()
            .find(|field| field.identifier == identifier)
    }

    pub fn fields(&self) -> impl ExactSizeIterator<Item = &MetaField> {
        self.fields.values()
    }

    pub(crate) fn insert_field(&mut self, field: MetaField) {
        self.fields
            .entry((field.name.clone(), field.ty))
            .or_insert(field);
    }
}
