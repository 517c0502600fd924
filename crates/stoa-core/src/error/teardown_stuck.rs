use super::Error;

/// Error when a teardown round drops nothing.
///
/// Indicates a structural problem such as a dependency cycle or missing
/// privileges. Lists the objects that could not be dropped.
#[derive(Debug)]
pub(super) struct TeardownStuckError {
    pub(super) remaining: Vec<String>,
}

impl std::error::Error for TeardownStuckError {}

impl core::fmt::Display for TeardownStuckError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "teardown made no progress; remaining objects: {}",
            self.remaining.join(", ")
        )
    }
}

impl Error {
    /// Creates a teardown error listing the undroppable objects.
    pub fn teardown_stuck(remaining: Vec<String>) -> Error {
        Error::from(super::ErrorKind::TeardownStuck(TeardownStuckError {
            remaining,
        }))
    }

    /// Returns `true` if this error is a teardown error.
    pub fn is_teardown_stuck(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::TeardownStuck(_))
    }

    /// The objects teardown could not drop, if this is a teardown error.
    pub fn teardown_remaining(&self) -> Option<&[String]> {
        match self.kind() {
            super::ErrorKind::TeardownStuck(err) => Some(&err.remaining),
            _ => None,
        }
    }
}
