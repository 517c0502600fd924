use stoa_core::{Error, Retry};

use std::fmt;

/// A simulated backend rejection.
#[derive(Debug)]
pub(crate) struct Failure {
    retry: Retry,
    message: String,
}

impl Failure {
    /// A conflict another writer may have caused. Mirrors duplicate-object
    /// and serialization failures on a real backend.
    pub(crate) fn retryable(message: impl Into<String>) -> Failure {
        Failure {
            retry: Retry::Retryable,
            message: message.into(),
        }
    }

    pub(crate) fn fatal(message: impl Into<String>) -> Failure {
        Failure {
            retry: Retry::Fatal,
            message: message.into(),
        }
    }

    pub(crate) fn into_error(self, intent: impl Into<String>) -> Error {
        let retry = self.retry;
        Error::backend_statement(intent, retry, self)
    }
}

impl std::error::Error for Failure {}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
