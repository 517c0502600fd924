use super::Job;
use crate::{
    backend::BackendConnection,
    ident::Translator,
    schema::{Change, Delta, MetaDatabase, MetaSnapshot},
    Error, Result,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddDatabase {
    pub name: String,

    /// Schema identifier requested by the caller
    pub identifier: Option<String>,
}

impl AddDatabase {
    pub(super) async fn execute(
        &self,
        snapshot: &MetaSnapshot,
        conn: &mut BackendConnection,
    ) -> Result<Delta> {
        if snapshot.database(&self.name).is_some() {
            return Ok(Delta::new());
        }

        let constraints = conn.capability().identifier.clone();
        let translator = Translator::new(&constraints);

        let identifier = match &self.identifier {
            Some(identifier) => {
                translator.check_explicit(identifier)?;
                if let Some(other) = snapshot.database_by_identifier(identifier) {
                    return Err(Error::validation(format!(
                        "schema `{identifier}` is already used by database `{}`",
                        other.name
                    )));
                }
                identifier.clone()
            }
            None => translator.schema_identifier(snapshot, &self.name)?,
        };

        let database = MetaDatabase::new(&self.name, identifier);
        conn.add_database(&database).await?;

        Ok(Change::AddDatabase(database).into())
    }
}

impl From<AddDatabase> for Job {
    fn from(value: AddDatabase) -> Job {
        Job::AddDatabase(value)
    }
}
