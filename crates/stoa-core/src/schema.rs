//! The logical schema model.
//!
//! Documents are schemaless, but every shape observed so far is recorded
//! here as a tree of [`MetaDatabase`] → [`MetaCollection`] → [`MetaDocPart`]
//! → [`MetaField`]. Each entity also carries the physical identifier it was
//! mapped to in the relational backend.
//!
//! Entities are immutable. A [`MetaSnapshot`] is a complete, consistent view
//! of the model; changes are expressed as a [`Delta`] and applied by building
//! a new snapshot. The [`SchemaModel`] holds the current snapshot shared by
//! all writers.

mod collection;
pub use collection::MetaCollection;

mod database;
pub use database::MetaDatabase;

pub mod db;

mod delta;
pub use delta::{Change, Delta};

mod doc_part;
pub use doc_part::MetaDocPart;

mod field;
pub use field::{FieldType, MetaField};

mod model;
pub use model::SchemaModel;

mod row;
pub use row::{MetaRow, MetaTable};

mod snapshot;
pub use snapshot::MetaSnapshot;

mod table_ref;
pub use table_ref::TableRef;
