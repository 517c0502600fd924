//! Schema synchronization for a document store kept in a relational
//! backend.
//!
//! The [`Server`] boots the backend and the shared schema model, hands out
//! connections, and runs schema jobs through [`SchemaSync`].

pub mod driver;

mod server;
pub use server::Server;

pub use stoa_core::{
    config, ident, job, lifecycle, schema, sync, teardown, BackendConnection, Config, Error,
    Job, MetaSnapshot, Result, SchemaModel, SchemaSync,
};
