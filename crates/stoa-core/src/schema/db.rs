//! Physical relational schema: the tables and columns the backend stores.

mod table;
pub use table::{Column, ForeignKey, Table, TableName};

mod ty;
pub use ty::Type;
