use super::{find_database, Job};
use crate::{
    backend::BackendConnection,
    ident::Translator,
    schema::{Change, Delta, MetaCollection, MetaDocPart, MetaSnapshot, TableRef},
    Error, Result,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddCollection {
    pub database: String,
    pub name: String,

    /// Table identifier requested by the caller
    pub identifier: Option<String>,
}

impl AddCollection {
    pub(super) async fn execute(
        &self,
        snapshot: &MetaSnapshot,
        conn: &mut BackendConnection,
    ) -> Result<Delta> {
        let database = find_database(snapshot, &self.database)?;

        if database.collection(&self.name).is_some() {
            return Ok(Delta::new());
        }

        let constraints = conn.capability().identifier.clone();
        let translator = Translator::new(&constraints);

        let identifier = match &self.identifier {
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
            None => translator.collection_identifier(database, &self.name)?,
        };

        // The root part is created along with the collection so that the
        // table identifier is claimed on the backend, not only in metadata.
        let collection = MetaCollection::new(&self.name, &identifier);
        let root = MetaDocPart::new(TableRef::root(), identifier);
        conn.add_collection(database, &collection).await?;
        conn.add_doc_part(database, &collection, &root).await?;

        let mut delta = Delta::from(Change::AddCollection {
            database: database.name.clone(),
            collection,
        });
        delta.push(Change::AddDocPart {
            database: database.name.clone(),
            collection: self.name.clone(),
            doc_part: root,
        });
        Ok(delta)
    }
}

impl From<AddCollection> for Job {
    fn from(value: AddCollection) -> Job {
        Job::AddCollection(value)
    }
}
