use super::Error;
use std::time::Duration;

#[derive(Debug)]
pub(super) struct BootTimeout {
    bundle: Box<str>,
    timeout: Duration,
}

impl std::error::Error for BootTimeout {}

impl core::fmt::Display for BootTimeout {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "bundle `{}` failed to start after waiting for {} milliseconds",
            self.bundle,
            self.timeout.as_millis()
        )
    }
}

impl Error {
    /// Creates an error for a bundle that did not reach running in time.
    pub fn boot_timeout(bundle: impl Into<String>, timeout: Duration) -> Error {
        Error::from(super::ErrorKind::BootTimeout(BootTimeout {
            bundle: bundle.into().into(),
            timeout,
        }))
    }

    pub fn is_boot_timeout(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::BootTimeout(_))
    }
}
