//! Executes schema jobs against a backend and publishes the result.

use crate::{
    backend::BackendConnection,
    config::SyncConfig,
    schema::{
        Delta, FieldType, MetaCollection, MetaDatabase, MetaDocPart, MetaField, MetaSnapshot,
        SchemaModel, TableRef,
    },
    Error, Job, Result,
};

use std::sync::Arc;
use tracing::{debug, info, warn};

/// Runs jobs to completion: execute, commit, then merge.
///
/// The shared model only changes after the backend transaction commits. A
/// failed job is rolled back and leaves the model untouched. Retryable
/// failures, typically another writer creating the same object first, are
/// attempted again once the model has moved on, at which point the job
/// usually finds the entity already present and reuses it.
#[derive(Debug, Clone)]
pub struct SchemaSync {
    model: SchemaModel,
    config: SyncConfig,
}

impl SchemaSync {
    pub fn new(model: SchemaModel, config: SyncConfig) -> SchemaSync {
        SchemaSync { model, config }
    }

    pub fn model(&self) -> &SchemaModel {
        &self.model
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Runs a single job in its own transaction. Returns the snapshot that
    /// includes the job's effect.
    pub async fn run(&self, conn: &mut BackendConnection, job: &Job) -> Result<Arc<MetaSnapshot>> {
        self.run_batch(conn, std::slice::from_ref(job)).await
    }

    /// Runs several jobs in one transaction. Later jobs see the entities
    /// added by earlier ones.
    pub async fn run_batch(
        &self,
        conn: &mut BackendConnection,
        jobs: &[Job],
    ) -> Result<Arc<MetaSnapshot>> {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            let snapshot = self.model.snapshot();

            let err = match self.attempt(&snapshot, conn, jobs).await {
                Ok(delta) if delta.is_empty() => return Ok(snapshot),
                Ok(delta) => {
                    let merged = self.model.merge(&delta);
                    info!(
                        jobs = jobs.len(),
                        version = merged.version(),
                        "schema change committed"
                    );
                    return Ok(merged);
                }
                Err(err) => err,
            };

            if let Err(rollback) = conn.rollback().await {
                return Err(err.context(rollback));
            }

            if !err.is_retryable() || attempt >= max_attempts {
                return Err(err);
            }

            warn!(
                attempt,
                max_attempts,
                error = %err,
                "schema change failed; retrying"
            );

            let changed = self
                .model
                .wait_for_change(snapshot.version(), self.config.retry_wait_duration())
                .await;
            debug!(changed, "retrying schema change");

            attempt += 1;
        }
    }

    async fn attempt(
        &self,
        snapshot: &MetaSnapshot,
        conn: &mut BackendConnection,
        jobs: &[Job],
    ) -> Result<Delta> {
        let mut view = snapshot.clone();
        let mut delta = Delta::new();

        for job in jobs {
            let change = job.execute(&view, conn).await?;
            if !change.is_empty() {
                view = view.apply(&change);
                delta.extend(change);
            }
        }

        conn.commit().await?;
        Ok(delta)
    }

    /// Makes sure the database exists and returns it.
    pub async fn ensure_database(
        &self,
        conn: &mut BackendConnection,
        database: &str,
    ) -> Result<MetaDatabase> {
        let snapshot = self.run(conn, &Job::add_database(database)).await?;

        snapshot
            .database(database)
            .cloned()
            .ok_or_else(|| Error::validation(format!("database `{database}` was dropped concurrently")))
    }

    /// Makes sure the collection, with its root table, and its database exist
    /// and returns the collection.
    pub async fn ensure_collection(
        &self,
        conn: &mut BackendConnection,
        database: &str,
        collection: &str,
    ) -> Result<MetaCollection> {
        let jobs = [
            Job::add_database(database),
            Job::add_collection(database, collection),
        ];
        let snapshot = self.run_batch(conn, &jobs).await?;

        snapshot
            .collection(database, collection)
            .cloned()
            .ok_or_else(|| {
                Error::validation(format!(
                    "collection `{database}.{collection}` was dropped concurrently"
                ))
            })
    }

    /// Makes sure the document part exists, along with its ancestors and the
    /// child fields linking each nested part to its parent.
    pub async fn ensure_doc_part(
        &self,
        conn: &mut BackendConnection,
        database: &str,
        collection: &str,
        table_ref: &TableRef,
    ) -> Result<MetaDocPart> {
        let jobs = doc_part_jobs(database, collection, table_ref);
        let snapshot = self.run_batch(conn, &jobs).await?;

        snapshot
            .doc_part(database, collection, table_ref)
            .cloned()
            .ok_or_else(|| {
                Error::validation(format!(
                    "document part {table_ref} of `{database}.{collection}` was dropped concurrently"
                ))
            })
    }

    /// Makes sure a field exists, creating everything on its path.
    pub async fn ensure_field(
        &self,
        conn: &mut BackendConnection,
        database: &str,
        collection: &str,
        table_ref: &TableRef,
        name: &str,
        ty: FieldType,
    ) -> Result<MetaField> {
        let mut jobs = doc_part_jobs(database, collection, table_ref);
        jobs.push(Job::add_field(
            database,
            collection,
            table_ref.clone(),
            name,
            ty,
        ));
        let snapshot = self.run_batch(conn, &jobs).await?;

        snapshot
            .field(database, collection, table_ref, name, ty)
            .cloned()
            .ok_or_else(|| {
                Error::validation(format!(
                    "field `{name}` of `{database}.{collection}` was dropped concurrently"
                ))
            })
    }
}

fn doc_part_jobs(database: &str, collection: &str, table_ref: &TableRef) -> Vec<Job> {
    let mut jobs = vec![
        Job::add_database(database),
        Job::add_collection(database, collection),
    ];

    for part in table_ref.ancestry() {
        if let (Some(parent), Some(key)) = (part.parent(), part.name()) {
            jobs.push(Job::add_field(
                database,
                collection,
                parent,
                key,
                FieldType::Child,
            ));
        }
        jobs.push(Job::add_doc_part(database, collection, part));
    }

    jobs
}
