use super::{Flavor, Params, ToSql};

use stoa_core::schema::db::Type;

impl ToSql for &Type {
    fn to_sql<T: Params>(self, f: &mut super::Formatter<'_, T>) {
        let flavor = f.serializer.flavor;

        match (self, flavor) {
            (Type::Boolean, _) => fmt!(f, "BOOLEAN"),
            (Type::Integer(1), Flavor::Mysql) => fmt!(f, "TINYINT"),
            (Type::Integer(1 | 2), _) => fmt!(f, "SMALLINT"),
            (Type::Integer(4), Flavor::Mysql) => fmt!(f, "INT"),
            (Type::Integer(4), _) => fmt!(f, "INTEGER"),
            (Type::Integer(_), _) => fmt!(f, "BIGINT"),
            (Type::Float(4), _) => fmt!(f, "REAL"),
            (Type::Float(_), Flavor::Postgresql) => fmt!(f, "DOUBLE PRECISION"),
            (Type::Float(_), _) => fmt!(f, "DOUBLE"),
            (Type::Text, Flavor::Derby) => fmt!(f, "CLOB"),
            (Type::Text, _) => fmt!(f, "TEXT"),
            (Type::VarChar(size), _) => {
                let size = *size;
                fmt!(f, "VARCHAR(" size ")")
            }
            (Type::Blob | Type::VarBinary(_), Flavor::Postgresql) => fmt!(f, "BYTEA"),
            (Type::Blob, Flavor::Mysql) => fmt!(f, "LONGBLOB"),
            (Type::Blob, Flavor::Derby) => fmt!(f, "BLOB"),
            (Type::VarBinary(size), Flavor::Mysql) => {
                let size = *size;
                fmt!(f, "VARBINARY(" size ")")
            }
            (Type::VarBinary(size), Flavor::Derby) => {
                let size = *size;
                fmt!(f, "VARCHAR(" size ") FOR BIT DATA")
            }
            (Type::Date, _) => fmt!(f, "DATE"),
            // Derby has no fractional precision on TIME
            (Type::Time(_), Flavor::Derby) => fmt!(f, "TIME"),
            (Type::Time(precision), _) => {
                let precision = u64::from(*precision);
                fmt!(f, "TIME(" precision ")")
            }
            (Type::Timestamp(_), Flavor::Derby) => fmt!(f, "TIMESTAMP"),
            (Type::Timestamp(precision), _) => {
                let precision = u64::from(*precision);
                let ty = if flavor == Flavor::Mysql {
                    "DATETIME("
                } else {
                    "TIMESTAMPTZ("
                };
                fmt!(f, ty precision ")")
            }
        }
    }
}
