use super::{MetaDocPart, TableRef};

use std::collections::BTreeMap;

/// A collection of documents within a database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaCollection {
    pub name: String,

    /// Table name reserved for the collection. The root document part is
    /// stored under this name; nested parts derive their names from it.
    pub identifier: String,

    doc_parts: BTreeMap<TableRef, MetaDocPart>,
}

impl MetaCollection {
    pub fn new(name: impl Into<String>, identifier: impl Into<String>) -> MetaCollection {
        MetaCollection {
            name: name.into(),
            identifier: identifier.into(),
            doc_parts: BTreeMap::new(),
        }
    }

    pub fn doc_part(&self, table_ref: &TableRef) -> Option<&MetaDocPart> {
        self.doc_parts.get(table_ref)
    }

    pub fn root_doc_part(&self) -> Option<&MetaDocPart> {
        self.doc_parts.get(&TableRef::root())
    }

    pub fn doc_part_by_identifier(&self, identifier: &str) -> Option<&MetaDocPart> {
        self.doc_parts
            .values()
            .find(|doc_part| doc_part.identifier == identifier)
    }

    /// Document parts ordered parent-first.
    pub fn doc_parts(&self) -> impl Iterator<Item = &MetaDocPart> {
        let mut doc_parts = self.doc_parts.values().collect::<Vec<_>>();
        doc_parts.sort_by_key(|doc_part| doc_part.table_ref.depth());
        doc_parts.into_iter()
    }

    pub(crate) fn doc_part_mut(&mut self, table_ref: &TableRef) -> Option<&mut MetaDocPart> {
        self.doc_parts.get_mut(table_ref)
    }

    pub(crate) fn insert_doc_part(&mut self, doc_part: MetaDocPart) {
        self.doc_parts
            .entry(doc_part.table_ref.clone())
            .or_insert(doc_part);
    }
}
