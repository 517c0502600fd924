use stoa_core::schema::db::TableName;

use std::fmt;

/// A possibly schema-qualified name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name(pub Vec<String>);

impl From<&str> for Name {
    fn from(value: &str) -> Name {
        Name(vec![value.into()])
    }
}

impl From<&String> for Name {
    fn from(value: &String) -> Name {
        Name::from(&value[..])
    }
}

impl From<&TableName> for Name {
    fn from(value: &TableName) -> Name {
        Name(vec![value.schema.clone(), value.table.clone()])
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = "";
        for ident in &self.0 {
            write!(f, "{s}{ident}")?;
            s = ".";
        }

        Ok(())
    }
}
