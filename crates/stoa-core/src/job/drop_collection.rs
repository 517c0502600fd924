use super::{find_collection, Job};
use crate::{
    backend::BackendConnection,
    schema::{Change, Delta, MetaSnapshot},
    Result,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropCollection {
    pub database: String,
    pub name: String,
}

impl DropCollection {
    pub(super) async fn execute(
        &self,
        snapshot: &MetaSnapshot,
        conn: &mut BackendConnection,
    ) -> Result<Delta> {
        let (database, collection) = find_collection(snapshot, &self.database, &self.name)?;

        conn.drop_collection(database, collection).await?;

        Ok(Change::DropCollection {
            database: database.name.clone(),
            collection: collection.name.clone(),
        }
        .into())
    }
}

impl From<DropCollection> for Job {
    fn from(value: DropCollection) -> Job {
        Job::DropCollection(value)
    }
}
