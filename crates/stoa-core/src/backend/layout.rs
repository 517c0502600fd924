//! Table layouts for document parts and the metadata tables.

use crate::{
    driver::Capability,
    schema::{
        db::{Column, ForeignKey, Table, TableName, Type},
        MetaCollection, MetaField, MetaTable, TableRef,
    },
};

/// Document id, the primary key of a root part
pub const DID: &str = "did";

/// Row id of a nested part's row
pub const RID: &str = "rid";

/// Id of the parent part's row
pub const PID: &str = "pid";

/// Position within an array
pub const SEQ: &str = "seq";

/// The table storing a document part, before any field columns are added.
///
/// Root parts are keyed by `did`. Nested parts are keyed by `rid` and point
/// at their parent's row with `pid`, enforced by a foreign key when the
/// backend supports them.
pub fn doc_part_table(
    capability: &Capability,
    schema: &str,
    collection: &MetaCollection,
    table_ref: &TableRef,
    identifier: &str,
) -> Table {
    let name = TableName::new(schema, identifier);
    let id = |name: &str| Column::new(name, Type::Integer(8), false);

    let Some(parent_ref) = table_ref.parent() else {
        return Table {
            name,
            columns: vec![id(DID)],
            primary_key: vec![DID.to_string()],
            foreign_key: None,
        };
    };

    let foreign_key = if capability.foreign_keys {
        collection.doc_part(&parent_ref).map(|parent| ForeignKey {
            columns: vec![PID.to_string()],
            references: TableName::new(schema, &parent.identifier),
            referenced_columns: vec![(if parent_ref.is_root() { DID } else { RID }).to_string()],
        })
    } else {
        None
    };

    Table {
        name,
        columns: vec![
            id(DID),
            id(RID),
            id(PID),
            Column::new(SEQ, Type::Integer(4), true),
        ],
        primary_key: vec![RID.to_string()],
        foreign_key,
    }
}

/// The column storing a field. Fields are optional in documents, so every
/// field column is nullable.
pub fn field_column(capability: &Capability, field: &MetaField) -> Column {
    Column::new(
        &field.identifier,
        Type::from_field(field.ty, &capability.storage_types),
        true,
    )
}

/// A metadata table in the system schema. All columns are strings; the
/// leading [`MetaTable::key_len`] columns form the primary key.
pub fn meta_table(capability: &Capability, table: MetaTable) -> Table {
    let columns = table
        .columns()
        .iter()
        .map(|name| {
            Column::new(
                *name,
                capability.storage_types.default_string_type.clone(),
                false,
            )
        })
        .collect();

    Table {
        name: TableName::new(capability.identifier.system_schema, table.name()),
        columns,
        primary_key: table.columns()[..table.key_len()]
            .iter()
            .map(|name| name.to_string())
            .collect(),
        foreign_key: None,
    }
}
