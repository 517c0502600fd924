use super::Error;

/// Error when rolling back a transaction fails.
///
/// The connection is left in an unknown state and must be discarded.
#[derive(Debug)]
pub(super) struct RollbackFailed {
    pub(super) inner: Box<dyn std::error::Error + Send + Sync>,
}

impl std::error::Error for RollbackFailed {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.inner.as_ref())
    }
}

impl core::fmt::Display for RollbackFailed {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str("rollback failed: ")?;
        core::fmt::Display::fmt(&self.inner, f)?;
        let mut source = self.inner.source();
        while let Some(err) = source {
            write!(f, ": {}", err)?;
            source = err.source();
        }
        Ok(())
    }
}

impl Error {
    /// Creates a rollback error from the driver's failure.
    pub fn rollback_failed(err: impl std::error::Error + Send + Sync + 'static) -> Error {
        Error::from(super::ErrorKind::RollbackFailed(RollbackFailed {
            inner: Box::new(err),
        }))
    }

    /// Returns `true` if this error is a rollback failure.
    pub fn is_rollback_failed(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::RollbackFailed(_))
    }
}
