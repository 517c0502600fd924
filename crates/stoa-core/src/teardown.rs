//! Resets a backend to an empty state.
//!
//! Teardown does not compute the dependency order between tables. It tries
//! to drop every table, each in its own transaction, and defers the ones the
//! backend refuses (typically because another table still references them)
//! to the next round. Each round drops at least one table or teardown gives
//! up, so a chain of `n` dependent tables takes at most `n` rounds and a
//! reference cycle is reported instead of looping forever.

use crate::{
    backend::BackendConnection,
    config::TeardownConfig,
    err,
    schema::{db::TableName, MetaSnapshot, SchemaModel},
    Error, Result,
};

use tracing::{debug, info};

/// What a teardown removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeardownReport {
    /// Number of drop rounds needed
    pub rounds: usize,

    /// Tables in the order they were dropped
    pub dropped_tables: Vec<TableName>,

    pub dropped_schemas: Vec<String>,
}

/// Drops every table and schema owned by the engine.
///
/// A schema is owned by the engine if the persisted metadata maps a database
/// to it and it is an identifier the engine could have allocated. Other
/// schemas on the backend are left alone.
///
/// The system schema is dropped last, once every owned schema is gone. If
/// teardown gets stuck the metadata is still in place, so the backend can be
/// loaded and torn down again.
///
/// When `model` is given it is reset to an empty snapshot after a successful
/// teardown.
pub async fn teardown(
    conn: &mut BackendConnection,
    config: &TeardownConfig,
    model: Option<&SchemaModel>,
) -> Result<TeardownReport> {
    let snapshot = conn.load_snapshot().await?;
    let (schemas, system_schema) = owned_schemas(conn, &snapshot).await?;

    let mut pending = conn.list_tables(schemas.clone()).await?;
    conn.commit().await?;

    let mut report = TeardownReport::default();

    while !pending.is_empty() {
        if config.max_rounds.is_some_and(|max| report.rounds >= max) {
            return Err(stuck(&pending));
        }
        report.rounds += 1;

        let mut deferred = vec![];

        for table in pending.iter() {
            match drop_table(conn, table).await {
                Ok(()) => report.dropped_tables.push(table.clone()),
                Err(err) if conn.is_broken() => return Err(err),
                Err(err) => {
                    debug!(table = %table, error = %err, "deferring table");
                    deferred.push(table.clone());
                }
            }
        }

        info!(
            round = report.rounds,
            dropped = pending.len() - deferred.len(),
            deferred = deferred.len(),
            "teardown round"
        );

        if deferred.len() == pending.len() {
            return Err(stuck(&deferred));
        }
        pending = deferred;
    }

    let cascade = conn.capability().drop_schema_cascade;
    for schema in schemas {
        drop_schema(conn, &schema, cascade).await?;
        report.dropped_schemas.push(schema);
    }

    if let Some(system_schema) = system_schema {
        // Metadata tables have no foreign keys between them
        let tables = conn.list_tables(vec![system_schema.clone()]).await?;
        conn.commit().await?;

        for table in tables {
            drop_table(conn, &table).await?;
            report.dropped_tables.push(table);
        }

        drop_schema(conn, &system_schema, cascade).await?;
        report.dropped_schemas.push(system_schema);
    }

    if let Some(model) = model {
        model.replace(MetaSnapshot::new());
    }

    info!(
        rounds = report.rounds,
        tables = report.dropped_tables.len(),
        schemas = report.dropped_schemas.len(),
        "teardown complete"
    );

    Ok(report)
}

/// Schemas eligible for teardown, and the system schema if it exists.
async fn owned_schemas(
    conn: &mut BackendConnection,
    snapshot: &MetaSnapshot,
) -> Result<(Vec<String>, Option<String>)> {
    let constraints = conn.capability().identifier.clone();
    let existing = conn.list_schemas().await?;
    conn.commit().await?;

    let schemas = existing
        .iter()
        .filter(|schema| {
            constraints.is_allowed_schema_identifier(schema)
                && snapshot.is_schema_identifier_used(schema)
        })
        .cloned()
        .collect::<Vec<_>>();

    let system_schema = existing
        .iter()
        .any(|schema| constraints.is_system_schema(schema))
        .then(|| constraints.system_schema.to_string());

    Ok((schemas, system_schema))
}

async fn drop_table(conn: &mut BackendConnection, table: &TableName) -> Result<()> {
    let result = match conn.drop_table(table.clone()).await {
        Ok(()) => conn.commit().await,
        Err(err) => Err(err),
    };

    match result {
        Ok(()) => Ok(()),
        Err(err) => match conn.rollback().await {
            Ok(()) => Err(err),
            Err(rollback) => Err(err.context(rollback)),
        },
    }
}

async fn drop_schema(conn: &mut BackendConnection, schema: &str, cascade: bool) -> Result<()> {
    let result = match conn.drop_schema(schema, cascade).await {
        Ok(()) => conn.commit().await,
        Err(err) => Err(err),
    };

    match result {
        Ok(()) => Ok(()),
        Err(err) => {
            let err = err.context(err!("failed to drop schema `{schema}`"));
            match conn.rollback().await {
                Ok(()) => Err(err),
                Err(rollback) => Err(err.context(rollback)),
            }
        }
    }
}

fn stuck(remaining: &[TableName]) -> Error {
    Error::teardown_stuck(remaining.iter().map(ToString::to_string).collect())
}
