use super::Error;

/// Error when a proposed schema change conflicts with the current logical
/// model.
///
/// This occurs when:
/// - The targeted database, collection or parent document part no longer
///   exists (the job was built from a stale read)
/// - A requested physical identifier is already mapped to a different
///   logical name, or is not a legal identifier for the dialect
///
/// Validation errors are never retried: the caller re-reads the model and
/// rebuilds the job.
#[derive(Debug)]
pub(super) struct ValidationError {
    message: Box<str>,
}

impl std::error::Error for ValidationError {}

impl core::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "validation failed: {}", self.message)
    }
}

impl Error {
    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Validation(ValidationError {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is a validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Validation(_))
    }
}
