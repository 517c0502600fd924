use super::Error;

/// Error when no legal physical identifier can be produced for a logical
/// name, even after disambiguation.
///
/// This is a configuration/limits problem: the dialect's identifier length
/// budget is too small to hold the name plus a disambiguating suffix.
#[derive(Debug)]
pub(super) struct IdentifierAllocationError {
    name: Box<str>,
    max_length: usize,
}

impl std::error::Error for IdentifierAllocationError {}

impl core::fmt::Display for IdentifierAllocationError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "no identifier of at most {} characters is available for `{}`",
            self.max_length, self.name
        )
    }
}

impl Error {
    /// Creates an identifier allocation error.
    pub fn identifier_allocation(name: impl Into<String>, max_length: usize) -> Error {
        Error::from(super::ErrorKind::IdentifierAllocation(
            IdentifierAllocationError {
                name: name.into().into(),
                max_length,
            },
        ))
    }

    /// Returns `true` if this error is an identifier allocation error.
    pub fn is_identifier_allocation(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::IdentifierAllocation(_))
    }
}
