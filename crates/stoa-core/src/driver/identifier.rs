/// Columns every document part table carries, managed by the engine.
///
/// * `did`: document id
/// * `rid`: row id of a nested part
/// * `pid`: row id (or document id) of the parent part's row
/// * `seq`: position within an array
pub const SYSTEM_COLUMNS: [&str; 4] = ["did", "rid", "pid", "seq"];

/// How the backend folds unquoted identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseFolding {
    Lower,
    Upper,
}

/// Lexical rules a physical identifier must satisfy on a backend.
#[derive(Debug, Clone)]
pub struct IdentifierConstraints {
    /// Longest identifier the backend accepts
    pub max_length: usize,

    pub case_folding: CaseFolding,

    /// Keywords that cannot be used as identifiers, in lowercase
    pub reserved: &'static [&'static str],

    /// Schema holding the engine's persisted metadata
    pub system_schema: &'static str,
}

impl IdentifierConstraints {
    pub const POSTGRESQL: IdentifierConstraints = IdentifierConstraints {
        max_length: 63,
        case_folding: CaseFolding::Lower,
        reserved: &[
            "all", "and", "any", "array", "as", "asc", "both", "case", "cast", "check",
            "collate", "column", "constraint", "create", "current_date", "current_time",
            "current_user", "default", "desc", "distinct", "do", "else", "end", "except",
            "false", "for", "foreign", "from", "grant", "group", "having", "in",
            "information_schema", "into", "leading", "limit", "not", "null", "offset",
            "on", "only", "or", "order", "pg_catalog", "pg_toast", "primary", "public",
            "references", "select", "table", "then", "to", "true", "union", "unique",
            "user", "using", "when", "where", "window", "with",
        ],
        system_schema: "stoa",
    };

    pub const MYSQL: IdentifierConstraints = IdentifierConstraints {
        max_length: 64,
        case_folding: CaseFolding::Lower,
        reserved: &[
            "add", "all", "alter", "and", "as", "asc", "between", "by", "case", "change",
            "column", "create", "database", "default", "delete", "desc", "distinct",
            "drop", "else", "exists", "false", "for", "foreign", "from", "group",
            "having", "in", "index", "information_schema", "insert", "interval", "into",
            "is", "key", "like", "limit", "mysql", "not", "null", "on", "or", "order",
            "performance_schema", "primary", "references", "schema", "select", "set",
            "sys", "table", "then", "to", "true", "union", "unique", "update", "use",
            "values", "when", "where", "with",
        ],
        system_schema: "stoa",
    };

    pub const DERBY: IdentifierConstraints = IdentifierConstraints {
        max_length: 128,
        case_folding: CaseFolding::Upper,
        reserved: &[
            "add", "all", "alter", "and", "as", "asc", "between", "by", "cascade",
            "case", "cast", "check", "column", "constraint", "create", "current",
            "date", "default", "delete", "desc", "distinct", "drop", "else", "end",
            "exists", "false", "for", "foreign", "from", "group", "having", "in",
            "insert", "into", "is", "key", "like", "not", "null", "on", "or", "order",
            "primary", "references", "restrict", "schema", "select", "set", "sys",
            "sysibm", "syscat", "syscs_diag", "syscs_util", "sysfun", "sysproc",
            "sysstat", "table", "time", "timestamp", "to", "true", "union", "unique",
            "update", "user", "values", "when", "where", "with",
        ],
        system_schema: "STOA",
    };

    /// Applies the backend's case folding.
    pub fn fold(&self, name: &str) -> String {
        match self.case_folding {
            CaseFolding::Lower => name.to_lowercase(),
            CaseFolding::Upper => name.to_uppercase(),
        }
    }

    /// Returns `true` if `c` may appear in an identifier after folding.
    pub fn is_allowed_char(&self, c: char) -> bool {
        match self.case_folding {
            CaseFolding::Lower => c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_',
            CaseFolding::Upper => c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_',
        }
    }

    /// Returns `true` if the identifier is a dialect keyword, an engine
    /// system column or the system schema name.
    pub fn is_reserved(&self, identifier: &str) -> bool {
        let lower = identifier.to_lowercase();
        self.reserved.contains(&lower.as_str())
            || SYSTEM_COLUMNS.contains(&lower.as_str())
            || lower == self.system_schema.to_lowercase()
    }

    /// Returns `true` if the identifier satisfies the lexical rules: not
    /// empty, within the length budget, made of allowed characters and not
    /// starting with a digit.
    pub fn is_legal(&self, identifier: &str) -> bool {
        !identifier.is_empty()
            && identifier.len() <= self.max_length
            && identifier.chars().all(|c| self.is_allowed_char(c))
            && !identifier.starts_with(|c: char| c.is_ascii_digit())
    }

    /// Returns `true` if the identifier could have been allocated by the
    /// engine for a database schema.
    pub fn is_allowed_schema_identifier(&self, identifier: &str) -> bool {
        self.is_legal(identifier) && !self.is_reserved(identifier)
    }

    pub fn is_system_schema(&self, identifier: &str) -> bool {
        identifier == self.system_schema
    }
}
