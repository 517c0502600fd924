use crate::Result;
use std::fmt;

/// Locates a document part within its collection: the sequence of keys from
/// the document root. The root part has an empty path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableRef(Vec<String>);

impl TableRef {
    pub fn root() -> TableRef {
        TableRef(vec![])
    }

    pub fn from_path<I, S>(path: I) -> TableRef
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TableRef(path.into_iter().map(Into::into).collect())
    }

    /// The part holding the sub-document stored under `key` of this part.
    pub fn child(&self, key: impl Into<String>) -> TableRef {
        let mut path = self.0.clone();
        path.push(key.into());
        TableRef(path)
    }

    pub fn parent(&self) -> Option<TableRef> {
        let (_, rest) = self.0.split_last()?;
        Some(TableRef(rest.to_vec()))
    }

    /// This part and all its ancestors, root first.
    pub fn ancestry(&self) -> impl Iterator<Item = TableRef> + '_ {
        (0..=self.0.len()).map(|len| TableRef(self.0[..len].to_vec()))
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn keys(&self) -> &[String] {
        &self.0
    }

    /// Last key of the path; `None` for the root.
    pub fn name(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Encoded form used by the persisted metadata rows. Keys may contain any
    /// character, so the path is stored as a JSON array.
    pub fn encode(&self) -> String {
        serde_json::Value::from(self.0.clone()).to_string()
    }

    pub fn decode(encoded: &str) -> Result<TableRef> {
        Ok(TableRef(serde_json::from_str(encoded)?))
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for key in &self.0 {
            write!(f, ".{key}")?;
        }
        Ok(())
    }
}
