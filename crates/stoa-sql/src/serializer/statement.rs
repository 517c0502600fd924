use super::{params::Param, Comma, Flavor, Ident, Params, ToSql};

use crate::stmt::{self, Statement};

impl ToSql for &Statement {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        match self {
            Statement::AddColumn(stmt) => stmt.to_sql(f),
            Statement::CreateSchema(stmt) => stmt.to_sql(f),
            Statement::CreateTable(stmt) => stmt.to_sql(f),
            Statement::Delete(stmt) => stmt.to_sql(f),
            Statement::DropSchema(stmt) => stmt.to_sql(f),
            Statement::DropTable(stmt) => stmt.to_sql(f),
            Statement::Insert(stmt) => stmt.to_sql(f),
            Statement::ListSchemas(stmt) => stmt.to_sql(f),
            Statement::ListTables(stmt) => stmt.to_sql(f),
            Statement::Select(stmt) => stmt.to_sql(f),
        }
    }
}

impl ToSql for &stmt::AddColumn {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        fmt!(f, "ALTER TABLE " self.table " ADD COLUMN " self.column);
    }
}

impl ToSql for &stmt::CreateSchema {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        let name = Ident(&self.name);
        fmt!(f, "CREATE SCHEMA " name);
    }
}

impl ToSql for &stmt::CreateTable {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        let columns = Comma(&self.columns);
        let primary_key = Comma(self.primary_key.iter().map(Ident));

        fmt!(f, "CREATE TABLE " self.name " (" columns ", PRIMARY KEY (" primary_key ")");

        if let Some(foreign_key) = &self.foreign_key {
            let columns = Comma(foreign_key.columns.iter().map(Ident));
            let referenced = Comma(foreign_key.referenced_columns.iter().map(Ident));

            fmt!(f, ", FOREIGN KEY (" columns ") REFERENCES " foreign_key.references " (" referenced ")");
        }

        fmt!(f, ")");
    }
}

impl ToSql for &stmt::Delete {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        fmt!(f, "DELETE FROM " self.table);

        let mut s = " WHERE ";
        for (column, value) in &self.filter {
            let column = Ident(column);
            let value = Param(value);
            fmt!(f, s column " = " value);
            s = " AND ";
        }
    }
}

impl ToSql for &stmt::DropSchema {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        let name = Ident(&self.name);
        let behavior = match f.serializer.flavor {
            // MySQL schemas are databases; dropping one always drops its
            // tables.
            Flavor::Mysql => "",
            // Derby only accepts RESTRICT
            Flavor::Derby => " RESTRICT",
            Flavor::Postgresql if self.cascade => " CASCADE",
            Flavor::Postgresql => " RESTRICT",
        };

        fmt!(f, "DROP SCHEMA " name behavior);
    }
}

impl ToSql for &stmt::DropTable {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        fmt!(f, "DROP TABLE " self.name);
    }
}

impl ToSql for &stmt::Insert {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        let columns = Comma(self.columns.iter().map(Ident));
        let values = Comma(self.values.iter().map(|value| Param(value)));

        fmt!(f, "INSERT INTO " self.table " (" columns ") VALUES (" values ")");
    }
}

impl ToSql for &stmt::Select {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        let columns = Comma(self.columns.iter().map(Ident));

        fmt!(f, "SELECT " columns " FROM " self.table);
    }
}

impl ToSql for &stmt::ListSchemas {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        match f.serializer.flavor {
            // information_schema columns are domains; cast so drivers read
            // and bind them as plain text
            Flavor::Postgresql => fmt!(
                f,
                "SELECT schema_name::text FROM information_schema.schemata \
                 WHERE left(schema_name, 3) <> 'pg_' AND schema_name <> 'information_schema'"
            ),
            Flavor::Mysql => fmt!(
                f,
                "SELECT schema_name FROM information_schema.schemata \
                 WHERE schema_name NOT IN ('information_schema', 'mysql', 'performance_schema', 'sys')"
            ),
            Flavor::Derby => fmt!(
                f,
                "SELECT schemaname FROM sys.sysschemas \
                 WHERE schemaname NOT IN ('NULLID', 'SQLJ', 'SYS', 'SYSCAT', 'SYSCS_DIAG', \
                 'SYSCS_UTIL', 'SYSFUN', 'SYSIBM', 'SYSPROC', 'SYSSTAT')"
            ),
        }
    }
}

impl ToSql for &stmt::ListTables {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        let (select, schema_column) = match f.serializer.flavor {
            Flavor::Postgresql => (
                "SELECT table_schema::text, table_name::text FROM information_schema.tables \
                 WHERE table_type = 'BASE TABLE'",
                "table_schema::text",
            ),
            Flavor::Mysql => (
                "SELECT table_schema, table_name FROM information_schema.tables \
                 WHERE table_type = 'BASE TABLE'",
                "table_schema",
            ),
            Flavor::Derby => (
                "SELECT s.schemaname, t.tablename FROM sys.systables t \
                 JOIN sys.sysschemas s ON t.schemaid = s.schemaid WHERE t.tabletype = 'T'",
                "s.schemaname",
            ),
        };

        fmt!(f, select);

        if self.schemas.is_empty() {
            fmt!(f, " AND 1 = 0");
        } else {
            let schemas = Comma(self.schemas.iter().map(|schema| Param(schema)));
            fmt!(f, " AND " schema_column " IN (" schemas ")");
        }
    }
}
