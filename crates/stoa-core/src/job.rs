//! Schema change jobs.
//!
//! A job describes one change to the logical schema: the target it applies
//! to and the entity to add or remove. Executing a job validates it against
//! a snapshot of the committed model, allocates physical identifiers, runs
//! the DDL and metadata writes on a backend connection, and returns the
//! [`Delta`] to merge once the connection commits. Executing never touches
//! the shared model.

mod add_collection;
pub use add_collection::AddCollection;

mod add_database;
pub use add_database::AddDatabase;

mod add_doc_part;
pub use add_doc_part::AddDocPart;

mod add_field;
pub use add_field::AddField;

mod drop_collection;
pub use drop_collection::DropCollection;

mod drop_database;
pub use drop_database::DropDatabase;

use crate::{
    backend::BackendConnection,
    schema::{Delta, FieldType, MetaCollection, MetaDatabase, MetaSnapshot, TableRef},
    Error, Result,
};

use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job {
    AddDatabase(AddDatabase),
    AddCollection(AddCollection),
    AddDocPart(AddDocPart),
    AddField(AddField),
    DropCollection(DropCollection),
    DropDatabase(DropDatabase),
}

impl Job {
    pub fn add_database(name: impl Into<String>) -> Job {
        Job::AddDatabase(AddDatabase {
            name: name.into(),
            identifier: None,
        })
    }

    pub fn add_collection(database: impl Into<String>, name: impl Into<String>) -> Job {
        Job::AddCollection(AddCollection {
            database: database.into(),
            name: name.into(),
            identifier: None,
        })
    }

    pub fn add_doc_part(
        database: impl Into<String>,
        collection: impl Into<String>,
        table_ref: TableRef,
    ) -> Job {
        Job::AddDocPart(AddDocPart {
            database: database.into(),
            collection: collection.into(),
            table_ref,
            identifier: None,
        })
    }

    pub fn add_field(
        database: impl Into<String>,
        collection: impl Into<String>,
        table_ref: TableRef,
        name: impl Into<String>,
        ty: FieldType,
    ) -> Job {
        Job::AddField(AddField {
            database: database.into(),
            collection: collection.into(),
            table_ref,
            name: name.into(),
            ty,
            identifier: None,
        })
    }

    pub fn drop_collection(database: impl Into<String>, name: impl Into<String>) -> Job {
        Job::DropCollection(DropCollection {
            database: database.into(),
            name: name.into(),
        })
    }

    pub fn drop_database(name: impl Into<String>) -> Job {
        Job::DropDatabase(DropDatabase { name: name.into() })
    }

    /// Requests a specific physical identifier instead of a translated one.
    /// Only meaningful for jobs that add an entity; ignored by drops.
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Job {
        let identifier = Some(identifier.into());
        match &mut self {
            Job::AddDatabase(job) => job.identifier = identifier,
            Job::AddCollection(job) => job.identifier = identifier,
            Job::AddDocPart(job) => job.identifier = identifier,
            Job::AddField(job) => job.identifier = identifier,
            Job::DropCollection(_) | Job::DropDatabase(_) => {}
        }
        self
    }

    /// Executes the job on the connection's open transaction.
    ///
    /// Returns an empty delta when the entity to add already exists in
    /// `snapshot`; the existing mapping is reused and nothing runs on the
    /// backend.
    pub async fn execute(
        &self,
        snapshot: &MetaSnapshot,
        conn: &mut BackendConnection,
    ) -> Result<Delta> {
        debug!(job = %self, "executing");

        match self {
            Job::AddDatabase(job) => job.execute(snapshot, conn).await,
            Job::AddCollection(job) => job.execute(snapshot, conn).await,
            Job::AddDocPart(job) => job.execute(snapshot, conn).await,
            Job::AddField(job) => job.execute(snapshot, conn).await,
            Job::DropCollection(job) => job.execute(snapshot, conn).await,
            Job::DropDatabase(job) => job.execute(snapshot, conn).await,
        }
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Job::AddDatabase(job) => write!(f, "add-database `{}`", job.name),
            Job::AddCollection(job) => {
                write!(f, "add-collection `{}.{}`", job.database, job.name)
            }
            Job::AddDocPart(job) => write!(
                f,
                "add-doc-part `{}.{}` {}",
                job.database, job.collection, job.table_ref
            ),
            Job::AddField(job) => write!(
                f,
                "add-field `{}` ({}) to `{}.{}` {}",
                job.name, job.ty, job.database, job.collection, job.table_ref
            ),
            Job::DropCollection(job) => {
                write!(f, "drop-collection `{}.{}`", job.database, job.name)
            }
            Job::DropDatabase(job) => write!(f, "drop-database `{}`", job.name),
        }
    }
}

fn find_database<'a>(snapshot: &'a MetaSnapshot, name: &str) -> Result<&'a MetaDatabase> {
    snapshot
        .database(name)
        .ok_or_else(|| Error::validation(format!("database `{name}` does not exist")))
}

fn find_collection<'a>(
    snapshot: &'a MetaSnapshot,
    database: &str,
    name: &str,
) -> Result<(&'a MetaDatabase, &'a MetaCollection)> {
    let database = find_database(snapshot, database)?;
    let collection = database.collection(name).ok_or_else(|| {
        Error::validation(format!(
            "collection `{}.{name}` does not exist",
            database.name
        ))
    })?;
    Ok((database, collection))
}
