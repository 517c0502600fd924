use super::{Bundle, Lifecycle, State};
use crate::{Error, Result};

use std::time::Duration;
use tracing::{error, info};

/// Bundles in start order.
#[derive(Debug)]
pub struct BundleStack {
    bundles: Vec<(Box<dyn Bundle>, Lifecycle)>,

    /// How long a single bundle may take to start
    boot_timeout: Duration,
}

impl BundleStack {
    pub fn new(boot_timeout: Duration) -> BundleStack {
        BundleStack {
            bundles: vec![],
            boot_timeout,
        }
    }

    /// Appends a bundle. It starts after, and stops before, every bundle
    /// pushed earlier.
    pub fn push(&mut self, bundle: impl Bundle) {
        self.push_boxed(Box::new(bundle));
    }

    pub fn push_boxed(&mut self, bundle: Box<dyn Bundle>) {
        let lifecycle = Lifecycle::new(bundle.name());
        self.bundles.push((bundle, lifecycle));
    }

    /// Current state of each bundle, in start order.
    pub fn states(&self) -> Vec<(String, State)> {
        self.bundles
            .iter()
            .map(|(bundle, lifecycle)| (bundle.name().to_string(), lifecycle.state()))
            .collect()
    }

    /// Starts all bundles in order.
    ///
    /// On failure, the bundles already running are stopped in reverse order
    /// and the start error is returned.
    pub async fn start(&mut self) -> Result<()> {
        for i in 0..self.bundles.len() {
            if let Err(err) = self.start_one(i).await {
                error!(error = %err, "bundle failed to start; stopping started bundles");
                if let Err(stop_err) = self.shutdown().await {
                    error!(error = %stop_err, "failed to stop bundles after start failure");
                }
                return Err(err);
            }
        }
        Ok(())
    }

    async fn start_one(&mut self, i: usize) -> Result<()> {
        let boot_timeout = self.boot_timeout;
        let (bundle, lifecycle) = &mut self.bundles[i];

        lifecycle.transition(State::Starting)?;
        info!(bundle = bundle.name(), "starting bundle");

        let outcome = tokio::time::timeout(boot_timeout, bundle.start()).await;
        let result = match outcome {
            Ok(result) => result,
            Err(_) => Err(Error::boot_timeout(bundle.name(), boot_timeout)),
        };

        match result {
            Ok(()) => lifecycle.transition(State::Running),
            Err(err) => {
                lifecycle.transition(State::Failed)?;
                Err(err)
            }
        }
    }

    /// Stops running bundles in reverse start order.
    ///
    /// Every running bundle is asked to stop even if an earlier one fails;
    /// the first failure is returned.
    pub async fn shutdown(&mut self) -> Result<()> {
        let mut first_err = None;

        for (bundle, lifecycle) in self.bundles.iter_mut().rev() {
            if lifecycle.state() != State::Running {
                continue;
            }

            lifecycle.transition(State::Stopping)?;
            info!(bundle = bundle.name(), "stopping bundle");

            match bundle.stop().await {
                Ok(()) => lifecycle.transition(State::Terminated)?,
                Err(err) => {
                    error!(bundle = bundle.name(), error = %err, "bundle failed to stop");
                    lifecycle.transition(State::Failed)?;
                    first_err.get_or_insert(err);
                }
            }
        }

        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
