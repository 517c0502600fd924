use super::{Delta, MetaSnapshot};

use std::{sync::Arc, time::Duration};
use tokio::sync::watch;
use tracing::debug;

/// The shared, current logical schema.
///
/// Cloning the model clones a handle; all clones observe the same snapshot.
/// Merges are serialized by the underlying channel, which is the only
/// mutually exclusive region of the engine. Readers never block writers.
#[derive(Debug, Clone)]
pub struct SchemaModel {
    current: Arc<watch::Sender<Arc<MetaSnapshot>>>,
}

impl SchemaModel {
    pub fn new(snapshot: MetaSnapshot) -> SchemaModel {
        let (tx, _) = watch::channel(Arc::new(snapshot));
        SchemaModel {
            current: Arc::new(tx),
        }
    }

    /// The current committed snapshot.
    pub fn snapshot(&self) -> Arc<MetaSnapshot> {
        self.current.borrow().clone()
    }

    pub fn version(&self) -> u64 {
        self.current.borrow().version()
    }

    /// Applies a committed delta and returns the resulting snapshot.
    ///
    /// Must only be called once the backend transaction that performed the
    /// delta's DDL has committed. Entities already present are kept as they
    /// are, so concurrent merges of the same addition converge.
    pub fn merge(&self, delta: &Delta) -> Arc<MetaSnapshot> {
        let mut merged = None;

        self.current.send_if_modified(|current| {
            let next = current.apply(delta);

            if next.version() == current.version() {
                merged = Some(current.clone());
                return false;
            }

            debug!(
                version = next.version(),
                changes = delta.changes().len(),
                "merged schema delta"
            );

            let next = Arc::new(next);
            *current = next.clone();
            merged = Some(next);
            true
        });

        match merged {
            Some(snapshot) => snapshot,
            None => self.snapshot(),
        }
    }

    /// Replaces the whole model, e.g. with the snapshot loaded at boot or an
    /// empty one after a teardown. The version keeps increasing so waiters
    /// observe the replacement.
    pub fn replace(&self, snapshot: MetaSnapshot) -> Arc<MetaSnapshot> {
        let mut replaced = Arc::new(snapshot);

        self.current.send_modify(|current| {
            Arc::make_mut(&mut replaced).set_version(current.version() + 1);
            *current = replaced.clone();
        });

        replaced
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<MetaSnapshot>> {
        self.current.subscribe()
    }

    /// Waits until the model moves past `version`, for at most `timeout`.
    /// Returns `true` if a newer snapshot was published.
    pub async fn wait_for_change(&self, version: u64, timeout: Duration) -> bool {
        let mut rx = self.current.subscribe();
        let newer = rx.wait_for(|snapshot| snapshot.version() > version);

        let changed = matches!(tokio::time::timeout(timeout, newer).await, Ok(Ok(_)));
        changed
    }
}

impl Default for SchemaModel {
    fn default() -> SchemaModel {
        SchemaModel::new(MetaSnapshot::new())
    }
}
