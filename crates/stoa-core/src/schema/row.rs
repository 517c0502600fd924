use super::{FieldType, TableRef};
use crate::{bail, Result};

/// The metadata tables kept in the engine's system schema. Together they
/// persist the logical model and its identifier mappings, so that a restart
/// reloads the exact physical names allocated before.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetaTable {
    Database,
    Collection,
    DocPart,
    Field,
}

impl MetaTable {
    /// Parent tables first.
    pub const ALL: [MetaTable; 4] = [
        MetaTable::Database,
        MetaTable::Collection,
        MetaTable::DocPart,
        MetaTable::Field,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MetaTable::Database => "database",
            MetaTable::Collection => "collection",
            MetaTable::DocPart => "doc_part",
            MetaTable::Field => "field",
        }
    }

    pub fn columns(self) -> &'static [&'static str] {
        match self {
            MetaTable::Database => &["name", "identifier"],
            MetaTable::Collection => &["database", "name", "identifier"],
            MetaTable::DocPart => &["database", "collection", "table_ref", "identifier"],
            MetaTable::Field => &[
                "database",
                "collection",
                "table_ref",
                "name",
                "type",
                "identifier",
            ],
        }
    }

    /// Number of leading columns forming the primary key.
    pub fn key_len(self) -> usize {
        self.columns().len() - 1
    }
}

/// One persisted metadata row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaRow {
    Database {
        name: String,
        identifier: String,
    },
    Collection {
        database: String,
        name: String,
        identifier: String,
    },
    DocPart {
        database: String,
        collection: String,
        table_ref: TableRef,
        identifier: String,
    },
    Field {
        database: String,
        collection: String,
        table_ref: TableRef,
        name: String,
        ty: FieldType,
        identifier: String,
    },
}

impl MetaRow {
    pub fn table(&self) -> MetaTable {
        match self {
            MetaRow::Database { .. } => MetaTable::Database,
            MetaRow::Collection { .. } => MetaTable::Collection,
            MetaRow::DocPart { .. } => MetaTable::DocPart,
            MetaRow::Field { .. } => MetaTable::Field,
        }
    }

    /// Column values in the order of [`MetaTable::columns`].
    pub fn to_values(&self) -> Vec<String> {
        match self {
            MetaRow::Database { name, identifier } => vec![name.clone(), identifier.clone()],
            MetaRow::Collection {
                database,
                name,
                identifier,
            } => vec![database.clone(), name.clone(), identifier.clone()],
            MetaRow::DocPart {
                database,
                collection,
                table_ref,
                identifier,
            } => vec![
                database.clone(),
                collection.clone(),
                table_ref.encode(),
                identifier.clone(),
            ],
            MetaRow::Field {
                database,
                collection,
                table_ref,
                name,
                ty,
                identifier,
            } => vec![
                database.clone(),
                collection.clone(),
                table_ref.encode(),
                name.clone(),
                ty.tag().to_string(),
                identifier.clone(),
            ],
        }
    }

    pub fn from_values(table: MetaTable, values: Vec<String>) -> Result<MetaRow> {
        if values.len() != table.columns().len() {
            bail!(
                "metadata table `{}` expects {} columns, got {}",
                table.name(),
                table.columns().len(),
                values.len()
            );
        }

        let mut values = values.into_iter();
        let mut next = || values.next().unwrap_or_default();

        Ok(match table {
            MetaTable::Database => MetaRow::Database {
                name: next(),
                identifier: next(),
            },
            MetaTable::Collection => MetaRow::Collection {
                database: next(),
                name: next(),
                identifier: next(),
            },
            MetaTable::DocPart => MetaRow::DocPart {
                database: next(),
                collection: next(),
                table_ref: TableRef::decode(&next())?,
                identifier: next(),
            },
            MetaTable::Field => MetaRow::Field {
                database: next(),
                collection: next(),
                table_ref: TableRef::decode(&next())?,
                name: next(),
                ty: FieldType::from_tag(&next())?,
                identifier: next(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_row_values() {
        let row = MetaRow::Field {
            database: "shop".into(),
            collection: "orders".into(),
            table_ref: TableRef::root().child("items"),
            name: "qty".into(),
            ty: FieldType::Integer,
            identifier: "qty_i".into(),
        };

        let values = row.to_values();
        assert_eq!(
            values,
            ["shop", "orders", "[\"items\"]", "qty", "i", "qty_i"]
        );
        assert_eq!(MetaRow::from_values(MetaTable::Field, values).unwrap(), row);
    }

    #[test]
    fn wrong_width_is_rejected() {
        let err = MetaRow::from_values(MetaTable::Database, vec!["shop".into()]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "metadata table `database` expects 2 columns, got 1"
        );
    }
}
