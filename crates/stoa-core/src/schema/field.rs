use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The runtime type of a document value, as inferred from observed data.
///
/// A field name seen with two different types produces two [`MetaField`]s,
/// each backed by its own column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Null,
    Boolean,
    Integer,
    Long,
    Double,
    String,
    Binary,
    Date,
    Time,
    Instant,
    ObjectId,

    /// The value is a sub-document or an array, stored in a child document
    /// part. The column records whether the child is an array.
    Child,
}

impl FieldType {
    pub const ALL: [FieldType; 12] = [
        FieldType::Null,
        FieldType::Boolean,
        FieldType::Integer,
        FieldType::Long,
        FieldType::Double,
        FieldType::String,
        FieldType::Binary,
        FieldType::Date,
        FieldType::Time,
        FieldType::Instant,
        FieldType::ObjectId,
        FieldType::Child,
    ];

    /// Short tag appended to column identifiers so that fields sharing a
    /// name but not a type map to distinct columns.
    pub fn tag(self) -> &'static str {
        match self {
            FieldType::Null => "n",
            FieldType::Boolean => "b",
            FieldType::Integer => "i",
            FieldType::Long => "l",
            FieldType::Double => "d",
            FieldType::String => "s",
            FieldType::Binary => "r",
            FieldType::Date => "c",
            FieldType::Time => "m",
            FieldType::Instant => "t",
            FieldType::ObjectId => "x",
            FieldType::Child => "e",
        }
    }

    pub fn from_tag(tag: &str) -> Result<FieldType> {
        FieldType::ALL
            .into_iter()
            .find(|ty| ty.tag() == tag)
            .ok_or_else(|| Error::from_args(format_args!("unknown field type tag `{tag}`")))
    }

    pub fn is_child(self) -> bool {
        matches!(self, FieldType::Child)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A field of a document part: a logical name, its type and the column that
/// stores it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaField {
    /// Name of the field in the document
    pub name: String,

    pub ty: FieldType,

    /// Name of the column in the backend
    pub identifier: String,
}

impl MetaField {
    pub fn new(name: impl Into<String>, ty: FieldType, identifier: impl Into<String>) -> MetaField {
        MetaField {
            name: name.into(),
            ty,
            identifier: identifier.into(),
        }
    }
}
