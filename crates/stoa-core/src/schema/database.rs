use super::MetaCollection;

use std::collections::BTreeMap;

/// A logical database, stored as one backend schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaDatabase {
    pub name: String,

    /// Name of the schema in the backend
    pub identifier: String,

    collections: BTreeMap<String, MetaCollection>,
}

impl MetaDatabase {
    pub fn new(name: impl Into<String>, identifier: impl Into<String>) -> MetaDatabase {
        MetaDatabase {
            name: name.into(),
            identifier: identifier.into(),
            collections: BTreeMap::new(),
        }
    }

    pub fn collection(&self, name: &str) -> Option<&MetaCollection> {
        self.collections.get(name)
    }

    pub fn collection_by_identifier(&self, identifier: &str) -> Option<&MetaCollection> {
        self.collections
            .values()
            .find(|collection| collection.identifier == identifier)
    }

    pub fn collections(&self) -> impl Iterator<Item = &MetaCollection> {
        self.collections.values()
    }

    /// Returns `true` if `identifier` names a table in this database's
    /// schema, either reserved by a collection or used by a document part.
    pub fn is_table_identifier_used(&self, identifier: &str) -> bool {
        self.collections.values().any(|collection| {
            collection.identifier == identifier
                || collection.doc_part_by_identifier(identifier).is_some()
        })
    }

    pub(crate) fn collection_mut(&mut self, name: &str) -> Option<&mut MetaCollection> {
        self.collections.get_mut(name)
    }

    pub(crate) fn insert_collection(&mut self, collection: MetaCollection) {
        self.collections
            .entry(collection.name.clone())
            .or_insert(collection);
    }

    pub(crate) fn clear_collections(&mut self) {
        self.collections.clear();
    }

    pub(crate) fn remove_collection(&mut self, name: &str) -> Option<MetaCollection> {
        self.collections.remove(name)
    }
}
