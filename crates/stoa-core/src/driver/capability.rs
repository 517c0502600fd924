use super::IdentifierConstraints;
use crate::schema::db;

use std::fmt;

/// The SQL engines the engine knows how to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    Postgresql,
    Mysql,
    Derby,
}

impl BackendKind {
    pub fn name(self) -> &'static str {
        match self {
            BackendKind::Postgresql => "postgresql",
            BackendKind::Mysql => "mysql",
            BackendKind::Derby => "derby",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone)]
pub struct Capability {
    /// The dialect spoken by the backend
    pub kind: BackendKind,

    /// Lexical rules for schema, table and column names
    pub identifier: IdentifierConstraints,

    /// Column storage types supported by the database
    pub storage_types: StorageTypes,

    /// The backend enforces foreign keys, so nested document parts reference
    /// their parent part's table.
    pub foreign_keys: bool,

    /// `DROP SCHEMA ... CASCADE` is available. Otherwise a schema can only be
    /// dropped once it is empty.
    pub drop_schema_cascade: bool,

    /// DDL statements take part in the surrounding transaction and are
    /// undone by a rollback. MySQL commits implicitly on DDL.
    pub transactional_ddl: bool,
}

#[derive(Debug, Clone)]
pub struct StorageTypes {
    /// The default storage type for a string.
    pub default_string_type: db::Type,

    /// When `Some` the database supports varchar types with the specified upper
    /// limit.
    pub varchar: Option<u64>,
}

impl Capability {
    /// PostgreSQL capabilities
    pub const POSTGRESQL: Capability = Capability {
        kind: BackendKind::Postgresql,
        identifier: IdentifierConstraints::POSTGRESQL,
        storage_types: StorageTypes::POSTGRESQL,
        foreign_keys: true,
        drop_schema_cascade: true,
        transactional_ddl: true,
    };

    /// MySQL capabilities
    pub const MYSQL: Capability = Capability {
        kind: BackendKind::Mysql,
        identifier: IdentifierConstraints::MYSQL,
        storage_types: StorageTypes::MYSQL,
        // A MySQL schema is a database; dropping it always drops its tables
        drop_schema_cascade: true,
        transactional_ddl: false,
        ..Capability::POSTGRESQL
    };

    /// Derby capabilities
    pub const DERBY: Capability = Capability {
        kind: BackendKind::Derby,
        identifier: IdentifierConstraints::DERBY,
        storage_types: StorageTypes::DERBY,
        drop_schema_cascade: false,
        ..Capability::POSTGRESQL
    };

    pub fn for_kind(kind: BackendKind) -> Capability {
        match kind {
            BackendKind::Postgresql => Capability::POSTGRESQL,
            BackendKind::Mysql => Capability::MYSQL,
            BackendKind::Derby => Capability::DERBY,
        }
    }
}

impl StorageTypes {
    pub const POSTGRESQL: StorageTypes = StorageTypes {
        default_string_type: db::Type::Text,

        // The maximum n you can specify is 10 485 760 characters.
        varchar: Some(10_485_760),
    };

    pub const MYSQL: StorageTypes = StorageTypes {
        default_string_type: db::Type::VarChar(255),

        // Subject to the 65,535 byte row size limit shared by all columns.
        varchar: Some(65_535),
    };

    pub const DERBY: StorageTypes = StorageTypes {
        default_string_type: db::Type::VarChar(32_672),
        varchar: Some(32_672),
    };
}
