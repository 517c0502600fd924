use super::Error;

/// Whether a failed backend statement may be attempted again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retry {
    /// Transient: connection loss, serialization failure, or a concurrent
    /// writer created the same object first.
    Retryable,

    /// Permanent: permission denied, dependent objects, malformed statement.
    Fatal,
}

/// Error when the backend rejects a statement.
///
/// Carries the driver error, the logical intent of the statement (never its
/// text, which may embed values) and the driver's retry classification.
#[derive(Debug)]
pub(super) struct BackendStatementError {
    pub(super) intent: Box<str>,
    pub(super) retry: Retry,
    pub(super) inner: Box<dyn std::error::Error + Send + Sync>,
}

impl std::error::Error for BackendStatementError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.inner.as_ref())
    }
}

impl core::fmt::Display for BackendStatementError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let class = match self.retry {
            Retry::Retryable => "retryable",
            Retry::Fatal => "fatal",
        };
        write!(f, "backend statement failed ({class}): {}: ", self.intent)?;

        // Display the error and walk its source chain
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
    /// Creates an error from a failed backend statement.
    ///
    /// Drivers call this with the operation's logical intent and their
    /// classification of the underlying driver error.
    pub fn backend_statement(
        intent: impl Into<String>,
        retry: Retry,
        err: impl std::error::Error + Send + Sync + 'static,
    ) -> Error {
        Error::from(super::ErrorKind::BackendStatement(BackendStatementError {
            intent: intent.into().into(),
            retry,
            inner: Box::new(err),
        }))
    }

    /// Returns `true` if this error is a backend statement failure.
    pub fn is_backend_statement(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::BackendStatement(_))
    }
}
