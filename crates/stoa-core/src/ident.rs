//! Translation of document names into physical SQL identifiers.
//!
//! Document keys and collection names may contain any character and have
//! any length. Backends accept a restricted alphabet, fold case and cap the
//! identifier length. The [`Translator`] bridges the two: it sanitizes a
//! logical name, fits it in the dialect's length budget and disambiguates
//! clashes with a numeric suffix. Results are deterministic for a given
//! model state, and the model records every allocation so a physical name
//! can always be traced back to its logical name.

use crate::{
    driver::IdentifierConstraints,
    schema::{FieldType, MetaCollection, MetaDatabase, MetaDocPart, MetaSnapshot, TableRef},
    Error, Result,
};

#[derive(Debug, Clone, Copy)]
pub struct Translator<'a> {
    constraints: &'a IdentifierConstraints,
}

impl<'a> Translator<'a> {
    pub fn new(constraints: &'a IdentifierConstraints) -> Translator<'a> {
        Translator { constraints }
    }

    /// Folds case and replaces every character the dialect does not accept.
    /// The result never starts with a digit and is never empty, but may
    /// exceed the length budget.
    pub fn sanitize(&self, name: &str) -> String {
        let mut sanitized = self
            .constraints
            .fold(name)
            .chars()
            .map(|c| if self.constraints.is_allowed_char(c) { c } else { '_' })
            .collect::<String>();

        if sanitized.is_empty() || sanitized.starts_with(|c: char| c.is_ascii_digit()) {
            sanitized.insert(0, '_');
        }

        sanitized
    }

    /// Allocates an identifier for `name` that is legal, not reserved and
    /// not `used`.
    ///
    /// A name that fits and is free is used as is. Otherwise suffixes `1`,
    /// `2`, ... are tried in order, truncating the base so that base and
    /// suffix fit the length budget. A truncated name always carries a
    /// suffix, which keeps two long names sharing a prefix visibly distinct.
    pub fn allocate(&self, name: &str, used: impl Fn(&str) -> bool) -> Result<String> {
        let max_length = self.constraints.max_length;
        let sanitized = self.sanitize(name);

        if sanitized.len() <= max_length && self.is_free(&sanitized, &used) {
            return Ok(sanitized);
        }

        for n in 1u64.. {
            let suffix = n.to_string();
            if suffix.len() >= max_length {
                break;
            }

            // Sanitized identifiers are ASCII, so byte offsets are char
            // boundaries.
            let base_len = sanitized.len().min(max_length - suffix.len());
            let candidate = format!("{}{suffix}", &sanitized[..base_len]);

            if self.is_free(&candidate, &used) {
                return Ok(candidate);
            }
        }

        Err(Error::identifier_allocation(name, max_length))
    }

    fn is_free(&self, candidate: &str, used: &impl Fn(&str) -> bool) -> bool {
        !self.constraints.is_reserved(candidate) && !used(candidate)
    }

    /// Checks a caller-requested identifier against the dialect's rules.
    pub fn check_explicit(&self, identifier: &str) -> Result<()> {
        if !self.constraints.is_legal(identifier) {
            return Err(Error::validation(format!(
                "`{identifier}` is not a legal identifier for this backend"
            )));
        }
        if self.constraints.is_reserved(identifier) {
            return Err(Error::validation(format!(
                "`{identifier}` is a reserved identifier"
            )));
        }
        Ok(())
    }

    /// The schema identifier for a database. Returns the existing mapping
    /// if the database is already known.
    pub fn schema_identifier(&self, snapshot: &MetaSnapshot, database: &str) -> Result<String> {
        if let Some(existing) = snapshot.database(database) {
            return Ok(existing.identifier.clone());
        }

        self.allocate(database, |candidate| {
            snapshot.is_schema_identifier_used(candidate)
        })
    }

    /// The table identifier reserved for a collection. Collections and
    /// document parts share the table scope of their database's schema.
    pub fn collection_identifier(&self, database: &MetaDatabase, collection: &str) -> Result<String> {
        if let Some(existing) = database.collection(collection) {
            return Ok(existing.identifier.clone());
        }

        self.allocate(collection, |candidate| {
            database.is_table_identifier_used(candidate)
        })
    }

    /// The table identifier for a document part. The root part is stored
    /// under the collection's identifier; nested parts append their path.
    pub fn doc_part_identifier(
        &self,
        database: &MetaDatabase,
        collection: &MetaCollection,
        table_ref: &TableRef,
    ) -> Result<String> {
        if let Some(existing) = collection.doc_part(table_ref) {
            return Ok(existing.identifier.clone());
        }

        if table_ref.is_root() {
            return Ok(collection.identifier.clone());
        }

        let name = format!("{}_{}", collection.identifier, table_ref.keys().join("_"));
        self.allocate(&name, |candidate| {
            database.is_table_identifier_used(candidate)
        })
    }

    /// The column identifier for a field: the field name tagged with its
    /// type, so the same name observed with two types maps to two columns.
    pub fn column_identifier(
        &self,
        doc_part: &MetaDocPart,
        name: &str,
        ty: FieldType,
    ) -> Result<String> {
        if let Some(existing) = doc_part.field(name, ty) {
            return Ok(existing.identifier.clone());
        }

        let tagged = format!("{name}_{}", ty.tag());
        self.allocate(&tagged, |candidate| {
            doc_part.field_by_identifier(candidate).is_some()
        })
    }
}
