//! Ordered start-up and shutdown of the server's bundles.
//!
//! A bundle is a unit of the running system with a start and a stop step:
//! the backend (connectivity and system schema), the core (the schema model
//! loaded from the backend), and the protocol front. Bundles start in
//! dependency order and stop in reverse. If one fails to start, the bundles
//! already running are stopped before the error is returned.

mod backend_bundle;
pub use backend_bundle::BackendBundle;

mod core_bundle;
pub use core_bundle::CoreBundle;

mod stack;
pub use stack::BundleStack;

use crate::{async_trait, Error, Result};

use std::fmt::Debug;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    New,
    Starting,
    Running,
    Stopping,
    Terminated,
    Failed,
}

#[async_trait]
pub trait Bundle: Debug + Send + 'static {
    fn name(&self) -> &str;

    async fn start(&mut self) -> Result<()>;

    async fn stop(&mut self) -> Result<()>;
}

/// Tracks a bundle's state and rejects out-of-order transitions.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    bundle: String,
    state: State,
}

impl Lifecycle {
    pub fn new(bundle: impl Into<String>) -> Lifecycle {
        Lifecycle {
            bundle: bundle.into(),
            state: State::New,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn transition(&mut self, to: State) -> Result<()> {
        use State::*;

        let valid = matches!(
            (self.state, to),
            (New, Starting)
                | (Starting, Running)
                | (Starting, Failed)
                | (Running, Stopping)
                | (Stopping, Terminated)
                | (Stopping, Failed)
        );

        if !valid {
            return Err(Error::invalid_transition(&self.bundle, self.state, to));
        }

        debug!(bundle = %self.bundle, from = ?self.state, ?to, "bundle transition");
        self.state = to;
        Ok(())
    }
}
