use super::Error;
use crate::lifecycle::State;

/// Error when a bundle is asked to move to a state it cannot reach from its
/// current one (e.g. starting a stopped bundle).
#[derive(Debug)]
pub(super) struct InvalidTransition {
    bundle: Box<str>,
    from: State,
    to: State,
}

impl std::error::Error for InvalidTransition {}

impl core::fmt::Display for InvalidTransition {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "bundle `{}` cannot transition from {:?} to {:?}",
            self.bundle, self.from, self.to
        )
    }
}

impl Error {
    pub fn invalid_transition(bundle: impl Into<String>, from: State, to: State) -> Error {
        Error::from(super::ErrorKind::InvalidTransition(InvalidTransition {
            bundle: bundle.into().into(),
            from,
            to,
        }))
    }

    pub fn is_invalid_transition(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidTransition(_))
    }
}
