mod retry;

use std::borrow::Cow;
use stoa_core::{
    async_trait,
    driver::{
        operation::Transaction, BackendKind, Capability, Driver, Operation, Response,
        TransactionManager,
    },
    schema::db::TableName,
    Error, Result,
};
use stoa_sql as sql;
use tokio_postgres::{types::ToSql, Client, Config, NoTls, Row};
use tracing::{debug, warn};
use url::Url;

#[derive(Debug)]
pub struct PostgreSQL {
    /// Connection URL without the password
    url: String,

    config: Config,
}

impl PostgreSQL {
    /// Creates a driver from a `postgresql://` (or `postgres://`) URL.
    pub fn new(url: impl Into<String>) -> Result<PostgreSQL> {
        let url_str = url.into();
        let mut url = Url::parse(&url_str)
            .map_err(|err| Error::invalid_connection_url(format!("{err}; url={url_str}")))?;

        if !matches!(url.scheme(), "postgresql" | "postgres") {
            return Err(Error::invalid_connection_url(format!(
                "connection URL does not have a `postgresql` scheme; url={url}"
            )));
        }

        let host = url.host_str().ok_or_else(|| {
            Error::invalid_connection_url(format!("missing host in connection URL; url={url}"))
        })?;

        let dbname = url.path().trim_start_matches('/');
        if dbname.is_empty() {
            return Err(Error::invalid_connection_url(format!(
                "no database specified - missing path in connection URL; url={url}"
            )));
        }

        let mut config = Config::new();
        config.host(host);
        config.dbname(dbname);

        if let Some(port) = url.port() {
            config.port(port);
        }

        if !url.username().is_empty() {
            config.user(url.username());
        }

        if let Some(password) = url.password() {
            config.password(password);
        }

        // Never keep the password in the displayed URL
        let _ = url.set_password(None);

        Ok(PostgreSQL::from_config(url.to_string(), config))
    }

    /// Creates a driver from a prepared [`tokio_postgres::Config`].
    pub fn from_config(url: impl Into<String>, config: Config) -> PostgreSQL {
        PostgreSQL {
            url: url.into(),
            config,
        }
    }
}

#[async_trait]
impl Driver for PostgreSQL {
    fn url(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.url)
    }

    fn capability(&self) -> &Capability {
        &Capability::POSTGRESQL
    }

    async fn connect(&self) -> Result<Box<dyn stoa_core::Connection>> {
        let (client, connection) = self.config.connect(NoTls).await.map_err(|err| {
            let retry = retry::classify(&err);
            Error::backend_statement("connect", retry, err)
        })?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                warn!(error = %e, "postgresql connection error");
            }
        });

        Ok(Box::new(Connection::new(client)))
    }
}

#[derive(Debug)]
pub struct Connection {
    client: Client,
    transaction_manager: TransactionManager,
}

impl Connection {
    pub fn new(client: Client) -> Connection {
        Connection {
            client,
            transaction_manager: TransactionManager::new(BackendKind::Postgresql),
        }
    }

    async fn transaction(&mut self, op: Transaction) -> Result<Response> {
        let sql = match op {
            Transaction::Start => self.transaction_manager.start()?,
            Transaction::Commit => self.transaction_manager.commit()?,
            Transaction::Rollback => self.transaction_manager.rollback()?,
        };

        self.client
            .batch_execute(sql)
            .await
            .map_err(|err| failed(sql, err))?;
        Ok(Response::count(0))
    }

    async fn statement(&mut self, op: Operation) -> Result<Response> {
        let intent = op.intent();
        let Some(stmt) = sql::Statement::from_operation(&op) else {
            return Err(Error::unsupported_feature(format!(
                "no statement for operation: {intent}"
            )));
        };

        let mut params = Vec::<String>::new();
        let sql = sql::Serializer::postgresql().serialize(&stmt, &mut params);
        let args = params
            .iter()
            .map(|param| param as &(dyn ToSql + Sync))
            .collect::<Vec<_>>();

        debug!(intent = %intent, "postgresql exec");

        if !stmt.is_query() {
            let count = self
                .client
                .execute(&sql, &args)
                .await
                .map_err(|err| failed(&intent, err))?;
            return Ok(Response::count(count));
        }

        let rows = self
            .client
            .query(&sql, &args)
            .await
            .map_err(|err| failed(&intent, err))?;

        match op {
            Operation::ListSchemas(_) => Ok(Response::Schemas(
                rows.iter()
                    .map(|row| text(row, 0))
                    .collect::<Result<Vec<_>>>()?,
            )),
            Operation::ListTables(_) => Ok(Response::Tables(
                rows.iter()
                    .map(|row| Ok(TableName::new(text(row, 0)?, text(row, 1)?)))
                    .collect::<Result<Vec<_>>>()?,
            )),
            _ => Ok(Response::Rows(
                rows.iter()
                    .map(|row| {
                        (0..row.len())
                            .map(|index| text(row, index))
                            .collect::<Result<Vec<_>>>()
                    })
                    .collect::<Result<Vec<_>>>()?,
            )),
        }
    }
}

#[async_trait]
impl stoa_core::Connection for Connection {
    async fn exec(&mut self, op: Operation) -> Result<Response> {
        match op {
            Operation::Transaction(op) => self.transaction(op).await,
            op => self.statement(op).await,
        }
    }

    async fn close(&mut self) -> Result<()> {
        if self.transaction_manager.is_open() {
            self.transaction(Transaction::Rollback).await?;
        }
        Ok(())
    }
}

/// Reads a text column. Metadata columns are never null, but a null reads as
/// the empty string.
fn text(row: &Row, index: usize) -> Result<String> {
    let value = row
        .try_get::<_, Option<String>>(index)
        .map_err(|err| failed("read column", err))?;
    Ok(value.unwrap_or_default())
}

fn failed(intent: &str, err: tokio_postgres::Error) -> Error {
    let retry = retry::classify(&err);
    Error::backend_statement(intent, retry, err)
}
