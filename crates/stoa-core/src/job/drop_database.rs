use super::{find_database, Job};
use crate::{
    backend::BackendConnection,
    schema::{Change, Delta, MetaSnapshot},
    Result,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropDatabase {
    pub name: String,
}

impl DropDatabase {
    pub(super) async fn execute(
        &self,
        snapshot: &MetaSnapshot,
        conn: &mut BackendConnection,
    ) -> Result<Delta> {
        let database = find_database(snapshot, &self.name)?;

        conn.drop_database(database).await?;

        Ok(Change::DropDatabase {
            database: database.name.clone(),
        }
        .into())
    }
}

impl From<DropDatabase> for Job {
    fn from(value: DropDatabase) -> Job {
        Job::DropDatabase(value)
    }
}
