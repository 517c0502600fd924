pub mod backend;
pub use backend::BackendConnection;

pub mod config;
pub use config::Config;

pub mod driver;
pub use driver::{Connection, Driver};

mod error;
pub use error::{Error, IntoError, Retry};

pub mod ident;

pub mod job;
pub use job::Job;

pub mod lifecycle;

pub mod schema;
pub use schema::{MetaSnapshot, SchemaModel};

pub mod sync;
pub use sync::SchemaSync;

pub mod teardown;

/// A Result type alias that uses Stoa's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

pub use async_trait::async_trait;
