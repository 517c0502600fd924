use crate::{driver::StorageTypes, schema::FieldType, Error, Result};

/// Database-level storage types.
///
/// `db::Type` is the type a column is declared with in `CREATE TABLE` and
/// `ALTER TABLE ... ADD COLUMN` statements. Each [`FieldType`] observed in
/// documents maps to exactly one storage type, chosen by the backend's
/// [`StorageTypes`] profile where backends differ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    /// A boolean value
    Boolean,

    /// A signed integer of `n` bytes
    Integer(u8),

    /// A floating point number of `n` bytes
    Float(u8),

    /// Unconstrained text type
    Text,

    /// Text type with an explicit maximum length
    VarChar(u64),

    /// Unconstrained binary type
    Blob,

    /// Binary type of at most `n` bytes
    VarBinary(u64),

    /// A civil date in the Gregorian calendar.
    Date,

    /// Wall clock time with fractional seconds precision (0-9 digits).
    Time(u8),

    /// An instant in time with fractional seconds precision (0-9 digits).
    Timestamp(u8),
}

impl Type {
    /// Maps a document field type to the column type storing it.
    pub fn from_field(ty: FieldType, db: &StorageTypes) -> Type {
        match ty {
            // Null values and sub-document markers only record presence
            FieldType::Null | FieldType::Boolean | FieldType::Child => Type::Boolean,
            FieldType::Integer => Type::Integer(4),
            FieldType::Long => Type::Integer(8),
            FieldType::Double => Type::Float(8),
            FieldType::String => db.default_string_type.clone(),
            FieldType::Binary => Type::Blob,
            FieldType::Date => Type::Date,
            FieldType::Time => Type::Time(6),
            FieldType::Instant => Type::Timestamp(6),
            FieldType::ObjectId => Type::VarBinary(12),
        }
    }

    pub(crate) fn verify(&self, db: &StorageTypes) -> Result<()> {
        match *self {
            Type::VarChar(size) => match db.varchar {
                Some(max) if size > max => Err(Error::unsupported_feature(format!(
                    "VARCHAR({size}) exceeds database maximum of {max}"
                ))),
                None => Err(Error::unsupported_feature(
                    "VARCHAR type is not supported by this database",
                )),
                _ => Ok(()),
            },
            _ => Ok(()),
        }
    }
}
