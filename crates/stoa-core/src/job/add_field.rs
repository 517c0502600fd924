use super::{find_collection, Job};
use crate::{
    backend::BackendConnection,
    ident::Translator,
    schema::{Change, Delta, FieldType, MetaField, MetaSnapshot, TableRef},
    Error, Result,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddField {
    pub database: String,
    pub collection: String,
    pub table_ref: TableRef,
    pub name: String,
    pub ty: FieldType,

    /// Column identifier requested by the caller
    pub identifier: Option<String>,
}

impl AddField {
    pub(super) async fn execute(
        &self,
        snapshot: &MetaSnapshot,
        conn: &mut BackendConnection,
    ) -> Result<Delta> {
        let (database, collection) = find_collection(snapshot, &self.database, &self.collection)?;

        let doc_part = collection.doc_part(&self.table_ref).ok_or_else(|| {
            Error::validation(format!(
                "document part {} of `{}.{}` does not exist",
                self.table_ref, database.name, collection.name
            ))
        })?;

        if doc_part.field(&self.name, self.ty).is_some() {
            return Ok(Delta::new());
        }

        let constraints = conn.capability().identifier.clone();
        let translator = Translator::new(&constraints);

        let identifier = match &self.identifier {
            Some(identifier) => {
                translator.check_explicit(identifier)?;
                if let Some(other) = doc_part.field_by_identifier(identifier) {
                    return Err(Error::validation(format!(
                        "column `{identifier}` of `{}` is already used by field `{}` ({})",
                        doc_part.identifier, other.name, other.ty
                    )));
                }
                identifier.clone()
            }
            None => translator.column_identifier(doc_part, &self.name, self.ty)?,
        };

        let field = MetaField::new(&self.name, self.ty, identifier);
        conn.add_field(database, collection, doc_part, &field).await?;

        Ok(Change::AddField {
            database: database.name.clone(),
            collection: collection.name.clone(),
            table_ref: self.table_ref.clone(),
            field,
        }
        .into())
    }
}

impl From<AddField> for Job {
    fn from(value: AddField) -> Job {
        Job::AddField(value)
    }
}
