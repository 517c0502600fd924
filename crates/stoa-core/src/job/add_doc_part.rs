use super::{find_collection, Job};
use crate::{
    backend::BackendConnection,
    ident::Translator,
    schema::{Change, Delta, MetaDocPart, MetaSnapshot, TableRef},
    Error, Result,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddDocPart {
    pub database: String,
    pub collection: String,
    pub table_ref: TableRef,

    /// Table identifier requested by the caller
    pub identifier: Option<String>,
}

impl AddDocPart {
    pub(super) async fn execute(
        &self,
        snapshot: &MetaSnapshot,
        conn: &mut BackendConnection,
    ) -> Result<Delta> {
        let (database, collection) = find_collection(snapshot, &self.database, &self.collection)?;

        if collection.doc_part(&self.table_ref).is_some() {
            return Ok(Delta::new());
        }

        if let Some(parent) = self.table_ref.parent() {
            if collection.doc_part(&parent).is_none() {
                return Err(Error::validation(format!(
                    "parent document part {parent} of `{}.{}` does not exist",
                    database.name, collection.name
                )));
            }
        }

        let constraints = conn.capability().identifier.clone();
        let translator = Translator::new(&constraints);

        let identifier = match &self.identifier {
            Some(identifier) if self.table_ref.is_root() => {
                if *identifier != collection.identifier {
                    return Err(Error::validation(format!(
                        "the root document part of `{}.{}` is stored in table `{}`",
                        database.name, collection.name, collection.identifier
                    )));
                }
                identifier.clone()
            }
            Some(identifier) => {
                translator.check_explicit(identifier)?;
                if database.is_table_identifier_used(identifier) {
                    return Err(Error::validation(format!(
                        "table `{identifier}` is already used in database `{}`",
                        database.name
                    )));
                }
                identifier.clone()
            }
            None => translator.doc_part_identifier(database, collection, &self.table_ref)?,
        };

        let doc_part = MetaDocPart::new(self.table_ref.clone(), identifier);
        conn.add_doc_part(database, collection, &doc_part).await?;

        Ok(Change::AddDocPart {
            database: database.name.clone(),
            collection: collection.name.clone(),
            doc_part,
        }
        .into())
    }
}

impl From<AddDocPart> for Job {
    fn from(value: AddDocPart) -> Job {
        Job::AddDocPart(value)
    }
}
