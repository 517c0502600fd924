use super::{MetaCollection, MetaDatabase, MetaDocPart, MetaField, TableRef};

/// A set of changes to the logical model produced by executing one or more
/// jobs. A delta is only applied to the shared model once the backend
/// transaction that performed the matching DDL has committed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Delta {
    changes: Vec<Change>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// A new, empty database
    AddDatabase(MetaDatabase),

    /// A new collection without document parts
    AddCollection {
        database: String,
        collection: MetaCollection,
    },

    /// A new document part without fields
    AddDocPart {
        database: String,
        collection: String,
        doc_part: MetaDocPart,
    },

    AddField {
        database: String,
        collection: String,
        table_ref: TableRef,
        field: MetaField,
    },

    DropCollection {
        database: String,
        collection: String,
    },

    DropDatabase {
        database: String,
    },
}

impl Delta {
    pub fn new() -> Delta {
        Delta::default()
    }

    pub fn push(&mut self, change: Change) {
        self.changes.push(change);
    }

    pub fn extend(&mut self, other: Delta) {
        self.changes.extend(other.changes);
    }

    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    /// An empty delta means the requested entities already existed.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

impl From<Change> for Delta {
    fn from(change: Change) -> Delta {
        Delta {
            changes: vec![change],
        }
    }
}
