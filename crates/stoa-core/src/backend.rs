//! The engine's view of one backend connection.
//!
//! [`BackendConnection`] wraps a driver [`Connection`] and exposes the schema
//! operations jobs are built from. Every operation runs inside a transaction
//! that is opened on first use and stays open until [`commit`] or
//! [`rollback`]. Each schema change writes its DDL and the metadata row
//! recording it in the same transaction.
//!
//! [`commit`]: BackendConnection::commit
//! [`rollback`]: BackendConnection::rollback

pub mod layout;

use crate::{
    bail,
    driver::{
        operation::{
            self, AddColumn, CreateSchema, CreateTable, DeleteMeta, DropSchema, DropTable,
            InsertMeta, ListSchemas, ListTables, SelectMeta,
        },
        Capability, Connection, Operation, Response,
    },
    schema::{
        db::{Table, TableName},
        MetaCollection, MetaDatabase, MetaDocPart, MetaField, MetaRow, MetaSnapshot, MetaTable,
    },
    Error, Result,
};

use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TxState {
    /// No transaction open
    Idle,

    /// Statements have run since the last commit or rollback
    Active,

    /// A rollback failed; the session state is unknown
    Broken,
}

#[derive(Debug)]
pub struct BackendConnection {
    connection: Box<dyn Connection>,
    capability: Capability,
    state: TxState,
}

impl BackendConnection {
    pub fn new(connection: Box<dyn Connection>, capability: Capability) -> BackendConnection {
        BackendConnection {
            connection,
            capability,
            state: TxState::Idle,
        }
    }

    pub fn capability(&self) -> &Capability {
        &self.capability
    }

    /// Returns `true` once a rollback has failed. A broken connection must be
    /// discarded.
    pub fn is_broken(&self) -> bool {
        self.state == TxState::Broken
    }

    /// Returns `true` if statements have run since the last commit or
    /// rollback.
    pub fn in_transaction(&self) -> bool {
        self.state == TxState::Active
    }

    fn system_schema(&self) -> String {
        self.capability.identifier.system_schema.to_string()
    }

    async fn exec(&mut self, op: impl Into<Operation>) -> Result<Response> {
        let op = op.into();

        match self.state {
            TxState::Broken => bail!("connection is broken after a failed rollback"),
            TxState::Idle => {
                self.connection
                    .exec(operation::Transaction::Start.into())
                    .await?;
                self.state = TxState::Active;
            }
            TxState::Active => {}
        }

        debug!(intent = %op.intent(), "exec");
        self.connection.exec(op).await
    }

    async fn insert_meta(&mut self, row: MetaRow) -> Result<()> {
        let schema = self.system_schema();
        self.exec(InsertMeta { schema, row }).await?;
        Ok(())
    }

    async fn delete_meta(
        &mut self,
        table: MetaTable,
        filter: Vec<(&'static str, String)>,
    ) -> Result<()> {
        let schema = self.system_schema();
        self.exec(DeleteMeta {
            schema,
            table,
            filter,
        })
        .await?;
        Ok(())
    }

    /// Creates the schema storing a database.
    pub async fn add_database(&mut self, database: &MetaDatabase) -> Result<()> {
        self.exec(CreateSchema {
            name: database.identifier.clone(),
        })
        .await?;

        self.insert_meta(MetaRow::Database {
            name: database.name.clone(),
            identifier: database.identifier.clone(),
        })
        .await
    }

    /// Records a collection. The table of its root document part is created
    /// separately with [`add_doc_part`](Self::add_doc_part).
    pub async fn add_collection(
        &mut self,
        database: &MetaDatabase,
        collection: &MetaCollection,
    ) -> Result<()> {
        self.insert_meta(MetaRow::Collection {
            database: database.name.clone(),
            name: collection.name.clone(),
            identifier: collection.identifier.clone(),
        })
        .await
    }

    /// Creates the table storing a document part. The parent part must
    /// already be part of `collection`.
    pub async fn add_doc_part(
        &mut self,
        database: &MetaDatabase,
        collection: &MetaCollection,
        doc_part: &MetaDocPart,
    ) -> Result<()> {
        let table = layout::doc_part_table(
            &self.capability,
            &database.identifier,
            collection,
            &doc_part.table_ref,
            &doc_part.identifier,
        );
        self.exec(CreateTable { table }).await?;

        self.insert_meta(MetaRow::DocPart {
            database: database.name.clone(),
            collection: collection.name.clone(),
            table_ref: doc_part.table_ref.clone(),
            identifier: doc_part.identifier.clone(),
        })
        .await
    }

    /// Adds the column storing a field to its document part's table.
    pub async fn add_field(
        &mut self,
        database: &MetaDatabase,
        collection: &MetaCollection,
        doc_part: &MetaDocPart,
        field: &MetaField,
    ) -> Result<()> {
        let column = layout::field_column(&self.capability, field);
        column.ty.verify(&self.capability.storage_types)?;

        self.exec(AddColumn {
            table: TableName::new(&database.identifier, &doc_part.identifier),
            column,
        })
        .await?;

        self.insert_meta(MetaRow::Field {
            database: database.name.clone(),
            collection: collection.name.clone(),
            table_ref: doc_part.table_ref.clone(),
            name: field.name.clone(),
            ty: field.ty,
            identifier: field.identifier.clone(),
        })
        .await
    }

    /// Drops a collection's tables, children before parents, and forgets its
    /// metadata.
    pub async fn drop_collection(
        &mut self,
        database: &MetaDatabase,
        collection: &MetaCollection,
    ) -> Result<()> {
        self.drop_collection_tables(database, collection).await?;

        for table in [MetaTable::Field, MetaTable::DocPart] {
            self.delete_meta(
                table,
                vec![
                    ("database", database.name.clone()),
                    ("collection", collection.name.clone()),
                ],
            )
            .await?;
        }
        self.delete_meta(
            MetaTable::Collection,
            vec![
                ("database", database.name.clone()),
                ("name", collection.name.clone()),
            ],
        )
        .await
    }

    async fn drop_collection_tables(
        &mut self,
        database: &MetaDatabase,
        collection: &MetaCollection,
    ) -> Result<()> {
        let mut doc_parts = collection.doc_parts().collect::<Vec<_>>();
        doc_parts.reverse();

        for doc_part in doc_parts {
            self.drop_table(TableName::new(&database.identifier, &doc_part.identifier))
                .await?;
        }
        Ok(())
    }

    /// Drops a database's schema with everything in it and forgets its
    /// metadata.
    pub async fn drop_database(&mut self, database: &MetaDatabase) -> Result<()> {
        let cascade = self.capability.drop_schema_cascade;

        if !cascade {
            for collection in database.collections() {
                self.drop_collection_tables(database, collection).await?;
            }
        }
        self.drop_schema(&database.identifier, cascade).await?;

        for table in [MetaTable::Field, MetaTable::DocPart, MetaTable::Collection] {
            self.delete_meta(table, vec![("database", database.name.clone())])
                .await?;
        }
        self.delete_meta(MetaTable::Database, vec![("name", database.name.clone())])
            .await
    }

    pub async fn drop_table(&mut self, name: TableName) -> Result<()> {
        self.exec(DropTable { name }).await?;
        Ok(())
    }

    pub async fn drop_schema(&mut self, name: &str, cascade: bool) -> Result<()> {
        self.exec(DropSchema {
            name: name.to_string(),
            cascade,
        })
        .await?;
        Ok(())
    }

    pub async fn list_schemas(&mut self) -> Result<Vec<String>> {
        self.exec(ListSchemas).await?.into_schemas()
    }

    pub async fn list_tables(&mut self, schemas: Vec<String>) -> Result<Vec<TableName>> {
        self.exec(ListTables { schemas }).await?.into_tables()
    }

    /// Commits the open transaction, if any.
    pub async fn commit(&mut self) -> Result<()> {
        match self.state {
            TxState::Idle => Ok(()),
            TxState::Broken => bail!("connection is broken after a failed rollback"),
            TxState::Active => {
                // A failed commit ends the transaction as well
                self.state = TxState::Idle;
                self.connection
                    .exec(operation::Transaction::Commit.into())
                    .await?;
                Ok(())
            }
        }
    }

    /// Rolls back the open transaction, if any.
    ///
    /// A failure leaves the connection broken and is reported as a rollback
    /// error.
    pub async fn rollback(&mut self) -> Result<()> {
        match self.state {
            TxState::Idle => Ok(()),
            TxState::Broken => bail!("connection is broken after a failed rollback"),
            TxState::Active => {
                match self
                    .connection
                    .exec(operation::Transaction::Rollback.into())
                    .await
                {
                    Ok(_) => {
                        self.state = TxState::Idle;
                        Ok(())
                    }
                    Err(err) => {
                        warn!(error = %err, "rollback failed; discarding connection");
                        self.state = TxState::Broken;
                        Err(Error::rollback_failed(err))
                    }
                }
            }
        }
    }

    /// Creates the system schema and metadata tables that are missing.
    pub async fn bootstrap(&mut self) -> Result<()> {
        let system_schema = self.system_schema();

        let existing = if self.list_schemas().await?.contains(&system_schema) {
            self.list_tables(vec![system_schema.clone()]).await?
        } else {
            self.exec(CreateSchema {
                name: system_schema.clone(),
            })
            .await?;
            vec![]
        };

        for meta in MetaTable::ALL {
            let table: Table = layout::meta_table(&self.capability, meta);
            if !existing.contains(&table.name) {
                debug!(table = %table.name, "creating metadata table");
                self.exec(CreateTable { table }).await?;
            }
        }

        self.commit().await
    }

    /// Reads the persisted metadata into a snapshot. Returns an empty
    /// snapshot if the backend was never bootstrapped.
    pub async fn load_snapshot(&mut self) -> Result<MetaSnapshot> {
        let system_schema = self.system_schema();
        let mut rows = vec![];

        if self.list_schemas().await?.contains(&system_schema) {
            for table in MetaTable::ALL {
                let values = self
                    .exec(SelectMeta {
                        schema: system_schema.clone(),
                        table,
                    })
                    .await?
                    .into_rows()?;

                for values in values {
                    rows.push(MetaRow::from_values(table, values)?);
                }
            }
        }

        self.commit().await?;

        let snapshot = MetaSnapshot::from_rows(rows)?;
        debug!(
            databases = snapshot.databases().count(),
            "loaded schema metadata"
        );
        Ok(snapshot)
    }

    /// Closes the connection, rolling back anything uncommitted.
    pub async fn close(mut self) -> Result<()> {
        if self.state == TxState::Active {
            self.rollback().await?;
        }
        self.connection.close().await
    }
}
