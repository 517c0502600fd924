use crate::Result;

pub use stoa_core::driver::{
    operation::{self, Operation},
    BackendKind, Capability, Connection, Driver, Response,
};

use std::sync::Arc;
use stoa_core::Error;
use url::Url;

/// Builds the driver for a connection URL, selected by its scheme.
pub fn connect(url: &str) -> Result<Arc<dyn Driver>> {
    let parsed = Url::parse(url)
        .map_err(|err| Error::invalid_connection_url(format!("{err}; url={url}")))?;

    match parsed.scheme() {
        "memory" => connect_memory(url),
        "postgresql" | "postgres" => connect_postgresql(url),
        scheme => Err(Error::invalid_connection_url(format!(
            "unsupported database; scheme={scheme}; url={parsed}"
        ))),
    }
}

#[cfg(feature = "memory")]
fn connect_memory(url: &str) -> Result<Arc<dyn Driver>> {
    let driver = stoa_driver_memory::Memory::new(url)?;
    Ok(Arc::new(driver))
}

#[cfg(not(feature = "memory"))]
fn connect_memory(_url: &str) -> Result<Arc<dyn Driver>> {
    Err(Error::unsupported_feature("`memory` feature not enabled"))
}

#[cfg(feature = "postgresql")]
fn connect_postgresql(url: &str) -> Result<Arc<dyn Driver>> {
    let driver = stoa_driver_postgresql::PostgreSQL::new(url)?;
    Ok(Arc::new(driver))
}

#[cfg(not(feature = "postgresql"))]
fn connect_postgresql(_url: &str) -> Result<Arc<dyn Driver>> {
    Err(Error::unsupported_feature("`postgresql` feature not enabled"))
}
