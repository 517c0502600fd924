use crate::failure::Failure;

use stoa_core::{
    driver::{operation, Operation, Response},
    schema::{db::TableName, MetaTable},
};

use std::collections::{BTreeMap, BTreeSet};

type Result<T> = std::result::Result<T, Failure>;

/// The objects stored by an in-memory backend.
///
/// Names are compared exactly, as a backend compares quoted identifiers.
#[derive(Debug, Clone, Default)]
pub(crate) struct Catalog {
    schemas: BTreeMap<String, Schema>,

    /// Tables the backend refuses to drop, as if permission was missing
    denied_drops: BTreeSet<TableName>,
}

#[derive(Debug, Clone, Default)]
struct Schema {
    tables: BTreeMap<String, Table>,
}

#[derive(Debug, Clone, Default)]
struct Table {
    columns: Vec<String>,

    /// Tables this one holds a foreign key to
    references: BTreeSet<TableName>,

    rows: Vec<Vec<String>>,
}

impl Catalog {
    pub(crate) fn apply(&mut self, op: &Operation) -> Result<Response> {
        match op {
            Operation::CreateSchema(op) => self.create_schema(&op.name),
            Operation::DropSchema(op) => self.drop_schema(op),
            Operation::CreateTable(op) => self.create_table(op),
            Operation::AddColumn(op) => self.add_column(op),
            Operation::DropTable(op) => self.drop_table(&op.name),
            Operation::InsertMeta(op) => self.insert_meta(op),
            Operation::DeleteMeta(op) => self.delete_meta(op),
            Operation::SelectMeta(op) => self.select_meta(op),
            Operation::ListSchemas(_) => Ok(Response::Schemas(self.schemas.keys().cloned().collect())),
            Operation::ListTables(op) => Ok(Response::Tables(self.list_tables(&op.schemas))),
            Operation::Transaction(_) => Err(Failure::fatal(
                "transaction control is handled by the connection",
            )),
        }
    }

    pub(crate) fn schema_names(&self) -> Vec<String> {
        self.schemas.keys().cloned().collect()
    }

    pub(crate) fn table_names(&self) -> Vec<TableName> {
        let schemas = self.schema_names();
        self.list_tables(&schemas)
    }

    pub(crate) fn columns(&self, name: &TableName) -> Option<Vec<String>> {
        self.table(name).map(|table| table.columns.clone())
    }

    pub(crate) fn deny_drop(&mut self, name: TableName) {
        self.denied_drops.insert(name);
    }

    /// Creates a table without going through a transaction, creating its
    /// schema as needed.
    pub(crate) fn create_unmanaged_table(&mut self, name: &TableName) {
        self.schemas
            .entry(name.schema.clone())
            .or_default()
            .tables
            .entry(name.table.clone())
            .or_default();
    }

    pub(crate) fn add_foreign_key(&mut self, from: &TableName, to: &TableName) -> Result<()> {
        if self.table(to).is_none() {
            return Err(Failure::fatal(format!("table `{to}` does not exist")));
        }
        self.table_mut(from)?.references.insert(to.clone());
        Ok(())
    }

    fn table(&self, name: &TableName) -> Option<&Table> {
        self.schemas.get(&name.schema)?.tables.get(&name.table)
    }

    fn table_mut(&mut self, name: &TableName) -> Result<&mut Table> {
        self.schemas
            .get_mut(&name.schema)
            .and_then(|schema| schema.tables.get_mut(&name.table))
            .ok_or_else(|| Failure::fatal(format!("table `{name}` does not exist")))
    }

    fn list_tables(&self, schemas: &[String]) -> Vec<TableName> {
        schemas
            .iter()
            .filter_map(|name| Some((name, self.schemas.get(name)?)))
            .flat_map(|(name, schema)| {
                schema
                    .tables
                    .keys()
                    .map(move |table| TableName::new(name, table))
            })
            .collect()
    }

    /// The first table outside `except` holding a foreign key to `name`.
    fn referencing(&self, name: &TableName, except: impl Fn(&TableName) -> bool) -> Option<TableName> {
        self.schemas.iter().find_map(|(schema_name, schema)| {
            schema.tables.iter().find_map(|(table_name, table)| {
                let from = TableName::new(schema_name, table_name);
                (!except(&from) && table.references.contains(name)).then_some(from)
            })
        })
    }

    fn create_schema(&mut self, name: &str) -> Result<Response> {
        if self.schemas.contains_key(name) {
            return Err(Failure::retryable(format!("schema `{name}` already exists")));
        }
        self.schemas.insert(name.to_string(), Schema::default());
        Ok(Response::count(0))
    }

    fn drop_schema(&mut self, op: &operation::DropSchema) -> Result<Response> {
        let Some(schema) = self.schemas.get(&op.name) else {
            return Err(Failure::fatal(format!("schema `{}` does not exist", op.name)));
        };

        if !op.cascade && !schema.tables.is_empty() {
            return Err(Failure::fatal(format!(
                "cannot drop schema `{}` because other objects depend on it",
                op.name
            )));
        }

        for table in schema.tables.keys() {
            let name = TableName::new(&op.name, table);
            if self.denied_drops.contains(&name) {
                return Err(Failure::fatal(format!("permission denied for table `{name}`")));
            }
        }

        self.schemas.remove(&op.name);

        // Cascading drops foreign keys into the schema as well
        for schema in self.schemas.values_mut() {
            for table in schema.tables.values_mut() {
                table.references.retain(|name| name.schema != op.name);
            }
        }

        Ok(Response::count(0))
    }

    fn create_table(&mut self, op: &operation::CreateTable) -> Result<Response> {
        let table = &op.table;

        if let Some(foreign_key) = &table.foreign_key {
            if foreign_key.references != table.name && self.table(&foreign_key.references).is_none() {
                return Err(Failure::fatal(format!(
                    "referenced table `{}` does not exist",
                    foreign_key.references
                )));
            }
        }

        let Some(schema) = self.schemas.get_mut(&table.name.schema) else {
            return Err(Failure::fatal(format!(
                "schema `{}` does not exist",
                table.name.schema
            )));
        };

        if schema.tables.contains_key(&table.name.table) {
            return Err(Failure::retryable(format!(
                "table `{}` already exists",
                table.name
            )));
        }

        schema.tables.insert(
            table.name.table.clone(),
            Table {
                columns: table.columns.iter().map(|column| column.name.clone()).collect(),
                references: table
                    .foreign_key
                    .iter()
                    .map(|foreign_key| foreign_key.references.clone())
                    .collect(),
                rows: vec![],
            },
        );

        Ok(Response::count(0))
    }

    fn add_column(&mut self, op: &operation::AddColumn) -> Result<Response> {
        let table = self.table_mut(&op.table)?;

        if table.columns.contains(&op.column.name) {
            return Err(Failure::retryable(format!(
                "column `{}` of table `{}` already exists",
                op.column.name, op.table
            )));
        }

        table.columns.push(op.column.name.clone());
        for row in &mut table.rows {
            row.push(String::new());
        }

        Ok(Response::count(0))
    }

    fn drop_table(&mut self, name: &TableName) -> Result<Response> {
        if self.table(name).is_none() {
            return Err(Failure::fatal(format!("table `{name}` does not exist")));
        }

        if self.denied_drops.contains(name) {
            return Err(Failure::fatal(format!("permission denied for table `{name}`")));
        }

        if let Some(from) = self.referencing(name, |from| from == name) {
            return Err(Failure::fatal(format!(
                "cannot drop table `{name}` because table `{from}` references it"
            )));
        }

        if let Some(schema) = self.schemas.get_mut(&name.schema) {
            schema.tables.remove(&name.table);
        }

        Ok(Response::count(0))
    }

    fn meta_table_name(schema: &str, table: MetaTable) -> TableName {
        TableName::new(schema, table.name())
    }

    fn insert_meta(&mut self, op: &operation::InsertMeta) -> Result<Response> {
        let meta = op.row.table();
        let values = op.row.to_values();
        let key_len = meta.key_len();
        let name = Catalog::meta_table_name(&op.schema, meta);
        let table = self.table_mut(&name)?;

        if table.rows.iter().any(|row| row[..key_len] == values[..key_len]) {
            return Err(Failure::retryable(format!(
                "duplicate key value violates the primary key of `{name}`"
            )));
        }

        table.rows.push(values);
        Ok(Response::count(1))
    }

    fn delete_meta(&mut self, op: &operation::DeleteMeta) -> Result<Response> {
        let columns = op.table.columns();
        let mut filter = vec![];

        for (column, value) in &op.filter {
            let Some(index) = columns.iter().position(|c| c == column) else {
                return Err(Failure::fatal(format!(
                    "column `{column}` of `{}` does not exist",
                    op.table.name()
                )));
            };
            filter.push((index, value));
        }

        let name = Catalog::meta_table_name(&op.schema, op.table);
        let table = self.table_mut(&name)?;
        let before = table.rows.len();

        table
            .rows
            .retain(|row| !filter.iter().all(|(index, value)| &row[*index] == *value));

        Ok(Response::count((before - table.rows.len()) as u64))
    }

    fn select_meta(&self, op: &operation::SelectMeta) -> Result<Response> {
        let name = Catalog::meta_table_name(&op.schema, op.table);
        let table = self
            .table(&name)
            .ok_or_else(|| Failure::fatal(format!("table `{name}` does not exist")))?;

        Ok(Response::Rows(table.rows.clone()))
    }
}
