use super::{
    Change, Delta, FieldType, MetaCollection, MetaDatabase, MetaDocPart, MetaField, MetaRow,
    TableRef,
};
use crate::{bail, Result};

use std::collections::BTreeMap;
use tracing::warn;

/// An immutable, consistent view of the logical schema.
///
/// Readers obtain a snapshot once and work against it; concurrent merges
/// produce new snapshots and never modify an existing one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetaSnapshot {
    /// Incremented every time a merge changes the model
    version: u64,

    databases: BTreeMap<String, MetaDatabase>,
}

impl MetaSnapshot {
    pub fn new() -> MetaSnapshot {
        MetaSnapshot::default()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub(crate) fn set_version(&mut self, version: u64) {
        self.version = version;
    }

    pub fn database(&self, name: &str) -> Option<&MetaDatabase> {
        self.databases.get(name)
    }

    /// Reverse mapping: the database stored in the given backend schema.
    pub fn database_by_identifier(&self, identifier: &str) -> Option<&MetaDatabase> {
        self.databases
            .values()
            .find(|database| database.identifier == identifier)
    }

    pub fn databases(&self) -> impl Iterator<Item = &MetaDatabase> {
        self.databases.values()
    }

    pub fn collection(&self, database: &str, collection: &str) -> Option<&MetaCollection> {
        self.database(database)?.collection(collection)
    }

    pub fn doc_part(
        &self,
        database: &str,
        collection: &str,
        table_ref: &TableRef,
    ) -> Option<&MetaDocPart> {
        self.collection(database, collection)?.doc_part(table_ref)
    }

    pub fn field(
        &self,
        database: &str,
        collection: &str,
        table_ref: &TableRef,
        name: &str,
        ty: FieldType,
    ) -> Option<&MetaField> {
        self.doc_part(database, collection, table_ref)?
            .field(name, ty)
    }

    pub fn is_schema_identifier_used(&self, identifier: &str) -> bool {
        self.database_by_identifier(identifier).is_some()
    }

    /// Returns a new snapshot with the delta applied.
    ///
    /// Additions of entities that already exist keep the existing entity:
    /// the first committed mapping for a logical name wins. Additions whose
    /// parent no longer exists are skipped. The version only advances when
    /// something changed.
    pub fn apply(&self, delta: &Delta) -> MetaSnapshot {
        let mut next = self.clone();
        let mut changed = false;

        for change in delta.changes() {
            changed |= next.apply_change(change);
        }

        if changed {
            next.version += 1;
        }

        next
    }

    fn apply_change(&mut self, change: &Change) -> bool {
        match change {
            Change::AddDatabase(database) => {
                if let Some(existing) = self.databases.get(&database.name) {
                    warn_if_remapped("database", &database.name, &existing.identifier, &database.identifier);
                    return false;
                }
                let mut database = database.clone();
                database.clear_collections();
                self.databases.insert(database.name.clone(), database);
                true
            }
            Change::AddCollection {
                database,
                collection,
            } => {
                let Some(database) = self.databases.get_mut(database) else {
                    warn!(collection = %collection.name, "skipping collection of a dropped database");
                    return false;
                };
                if let Some(existing) = database.collection(&collection.name) {
                    warn_if_remapped("collection", &collection.name, &existing.identifier, &collection.identifier);
                    return false;
                }
                database.insert_collection(MetaCollection::new(
                    collection.name.clone(),
                    collection.identifier.clone(),
                ));
                true
            }
            Change::AddDocPart {
                database,
                collection,
                doc_part,
            } => {
                let Some(collection) = self
                    .databases
                    .get_mut(database)
                    .and_then(|database| database.collection_mut(collection))
                else {
                    warn!(table_ref = %doc_part.table_ref, "skipping document part of a dropped collection");
                    return false;
                };
                if let Some(existing) = collection.doc_part(&doc_part.table_ref) {
                    warn_if_remapped("document part", &doc_part.table_ref.to_string(), &existing.identifier, &doc_part.identifier);
                    return false;
                }
                collection.insert_doc_part(MetaDocPart::new(
                    doc_part.table_ref.clone(),
                    doc_part.identifier.clone(),
                ));
                true
            }
            Change::AddField {
                database,
                collection,
                table_ref,
                field,
            } => {
                let Some(doc_part) = self
                    .databases
                    .get_mut(database)
                    .and_then(|database| database.collection_mut(collection))
                    .and_then(|collection| collection.doc_part_mut(table_ref))
                else {
                    warn!(field = %field.name, "skipping field of a dropped document part");
                    return false;
                };
                if let Some(existing) = doc_part.field(&field.name, field.ty) {
                    warn_if_remapped("field", &field.name, &existing.identifier, &field.identifier);
                    return false;
                }
                doc_part.insert_field(field.clone());
                true
            }
            Change::DropCollection {
                database,
                collection,
            } => self
                .databases
                .get_mut(database)
                .and_then(|database| database.remove_collection(collection))
                .is_some(),
            Change::DropDatabase { database } => self.databases.remove(database).is_some(),
        }
    }

    /// Rebuilds a snapshot from persisted metadata rows.
    pub fn from_rows(rows: impl IntoIterator<Item = MetaRow>) -> Result<MetaSnapshot> {
        let mut rows = rows.into_iter().collect::<Vec<_>>();
        // Parents must be loaded before their children. Document parts are
        // additionally ordered by depth.
        rows.sort_by_key(|row| match row {
            MetaRow::DocPart { table_ref, .. } => (row.table(), table_ref.depth()),
            _ => (row.table(), 0),
        });

        let mut snapshot = MetaSnapshot::new();

        for row in rows {
            let change = match row {
                MetaRow::Database { name, identifier } => {
                    Change::AddDatabase(MetaDatabase::new(name, identifier))
                }
                MetaRow::Collection {
                    database,
                    name,
                    identifier,
                } => {
                    if snapshot.database(&database).is_none() {
                        bail!("metadata for collection `{name}` references unknown database `{database}`");
                    }
                    Change::AddCollection {
                        database,
                        collection: MetaCollection::new(name, identifier),
                    }
                }
                MetaRow::DocPart {
                    database,
                    collection,
                    table_ref,
                    identifier,
                } => {
                    if snapshot.collection(&database, &collection).is_none() {
                        bail!("metadata for document part `{table_ref}` references unknown collection `{database}.{collection}`");
                    }
                    if let Some(parent) = table_ref.parent() {
                        if snapshot.doc_part(&database, &collection, &parent).is_none() {
                            bail!("metadata for document part `{table_ref}` of `{database}.{collection}` has no parent part");
                        }
                    }
                    Change::AddDocPart {
                        database,
                        collection,
                        doc_part: MetaDocPart::new(table_ref, identifier),
                    }
                }
                MetaRow::Field {
                    database,
                    collection,
                    table_ref,
                    name,
                    ty,
                    identifier,
                } => {
                    if snapshot.doc_part(&database, &collection, &table_ref).is_none() {
                        bail!("metadata for field `{name}` references unknown document part `{table_ref}` of `{database}.{collection}`");
                    }
                    Change::AddField {
                        database,
                        collection,
                        table_ref,
                        field: MetaField::new(name, ty, identifier),
                    }
                }
            };
            snapshot.apply_change(&change);
        }

        Ok(snapshot)
    }

    /// The metadata rows describing this snapshot, parents first.
    pub fn to_rows(&self) -> Vec<MetaRow> {
        let mut rows = vec![];

        for database in self.databases() {
            rows.push(MetaRow::Database {
                name: database.name.clone(),
                identifier: database.identifier.clone(),
            });

            for collection in database.collections() {
                rows.push(MetaRow::Collection {
                    database: database.name.clone(),
                    name: collection.name.clone(),
                    identifier: collection.identifier.clone(),
                });

                for doc_part in collection.doc_parts() {
                    rows.push(MetaRow::DocPart {
                        database: database.name.clone(),
                        collection: collection.name.clone(),
                        table_ref: doc_part.table_ref.clone(),
                        identifier: doc_part.identifier.clone(),
                    });

                    for field in doc_part.fields() {
                        rows.push(MetaRow::Field {
                            database: database.name.clone(),
                            collection: collection.name.clone(),
                            table_ref: doc_part.table_ref.clone(),
                            name: field.name.clone(),
                            ty: field.ty,
                            identifier: field.identifier.clone(),
                        });
                    }
                }
            }
        }

        rows
    }
}

fn warn_if_remapped(entity: &str, name: &str, existing: &str, proposed: &str) {
    if existing != proposed {
        warn!(
            entity,
            name, existing, proposed, "keeping first committed identifier"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn shop() -> MetaSnapshot {
        let mut delta = Delta::new();
        delta.push(Change::AddDatabase(MetaDatabase::new("shop", "shop")));
        delta.push(Change::AddCollection {
            database: "shop".into(),
            collection: MetaCollection::new("orders", "orders"),
        });
        delta.push(Change::AddDocPart {
            database: "shop".into(),
            collection: "orders".into(),
            doc_part: MetaDocPart::new(TableRef::root(), "orders"),
        });
        delta.push(Change::AddField {
            database: "shop".into(),
            collection: "orders".into(),
            table_ref: TableRef::root(),
            field: MetaField::new("total", FieldType::Double, "total_d"),
        });
        MetaSnapshot::new().apply(&delta)
    }

    #[test]
    fn apply_builds_a_new_version() {
        let empty = MetaSnapshot::new();
        let snapshot = shop();

        assert_eq!(empty.version(), 0);
        assert!(empty.database("shop").is_none());
        assert_eq!(snapshot.version(), 1);
        assert_eq!(
            snapshot
                .field("shop", "orders", &TableRef::root(), "total", FieldType::Double)
                .unwrap()
                .identifier,
            "total_d"
        );
    }

    #[test]
    fn first_mapping_wins() {
        let snapshot = shop();
        let delta = Delta::from(Change::AddField {
            database: "shop".into(),
            collection: "orders".into(),
            table_ref: TableRef::root(),
            field: MetaField::new("total", FieldType::Double, "total_d1"),
        });

        let next = snapshot.apply(&delta);
        assert_eq!(next, snapshot);
        assert_eq!(next.version(), snapshot.version());
    }

    #[test]
    fn same_name_different_type_is_a_new_field() {
        let snapshot = shop().apply(&Delta::from(Change::AddField {
            database: "shop".into(),
            collection: "orders".into(),
            table_ref: TableRef::root(),
            field: MetaField::new("total", FieldType::String, "total_s"),
        }));

        let root = snapshot.doc_part("shop", "orders", &TableRef::root()).unwrap();
        assert_eq!(root.fields_named("total").count(), 2);
    }

    #[test]
    fn drop_collection_releases_identifiers() {
        let snapshot = shop();
        assert!(snapshot.database("shop").unwrap().is_table_identifier_used("orders"));

        let next = snapshot.apply(&Delta::from(Change::DropCollection {
            database: "shop".into(),
            collection: "orders".into(),
        }));
        assert!(next.collection("shop", "orders").is_none());
        assert!(!next.database("shop").unwrap().is_table_identifier_used("orders"));
    }

    #[test]
    fn rows_round_trip() {
        let snapshot = shop();
        let rows = snapshot.to_rows();
        assert_eq!(rows.len(), 4);

        // Loading is order independent
        let reloaded = MetaSnapshot::from_rows(rows.into_iter().rev()).unwrap();
        assert_eq!(reloaded.to_rows(), snapshot.to_rows());
    }

    #[test]
    fn orphan_rows_are_rejected() {
        let err = MetaSnapshot::from_rows([MetaRow::Collection {
            database: "nope".into(),
            name: "orders".into(),
            identifier: "orders".into(),
        }])
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "metadata for collection `orders` references unknown database `nope`"
        );
    }
}
