use crate::Result;

use serde::Deserialize;
use std::time::Duration;

/// Configuration for the schema synchronization engine
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Where the relational backend lives
    pub backend: BackendConfig,

    /// Retry policy for schema jobs
    pub sync: SyncConfig,

    /// Bounds for resetting the backend
    pub teardown: TeardownConfig,

    /// Bundle start-up behavior
    pub lifecycle: LifecycleConfig,
}

impl Config {
    /// Create a new Config with default values
    pub fn new() -> Config {
        Config::default()
    }

    /// Parses a configuration from TOML. Missing keys take their defaults.
    pub fn from_toml_str(input: &str) -> Result<Config> {
        Ok(toml::from_str(input)?)
    }

    pub fn backend(mut self, backend: BackendConfig) -> Config {
        self.backend = backend;
        self
    }

    pub fn sync(mut self, sync: SyncConfig) -> Config {
        self.sync = sync;
        self
    }

    pub fn teardown(mut self, teardown: TeardownConfig) -> Config {
        self.teardown = teardown;
        self
    }

    pub fn lifecycle(mut self, lifecycle: LifecycleConfig) -> Config {
        self.lifecycle = lifecycle;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackendConfig {
    /// Connection URL; the scheme selects the driver
    pub url: String,
}

impl Default for BackendConfig {
    fn default() -> BackendConfig {
        BackendConfig {
            url: "memory://".to_string(),
        }
    }
}

impl BackendConfig {
    pub fn url(mut self, url: impl Into<String>) -> BackendConfig {
        self.url = url.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    /// How many times a job is attempted when it fails with a retryable
    /// error, including the first attempt
    pub max_attempts: u32,

    /// Longest wait for another writer to publish a new model version
    /// before retrying, in milliseconds
    pub retry_wait_ms: u64,
}

impl Default for SyncConfig {
    fn default() -> SyncConfig {
        SyncConfig {
            max_attempts: 3,
            retry_wait_ms: 100,
        }
    }
}

impl SyncConfig {
    pub fn max_attempts(mut self, max_attempts: u32) -> SyncConfig {
        self.max_attempts = max_attempts;
        self
    }

    pub fn retry_wait(mut self, wait: Duration) -> SyncConfig {
        self.retry_wait_ms = wait.as_millis() as u64;
        self
    }

    pub fn retry_wait_duration(&self) -> Duration {
        Duration::from_millis(self.retry_wait_ms)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TeardownConfig {
    /// Upper bound on drop rounds. When unset, teardown continues as long
    /// as each round drops at least one table.
    pub max_rounds: Option<usize>,
}

impl TeardownConfig {
    pub fn max_rounds(mut self, max_rounds: usize) -> TeardownConfig {
        self.max_rounds = Some(max_rounds);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LifecycleConfig {
    /// How long each bundle may take to start, in milliseconds
    pub boot_timeout_ms: u64,
}

impl Default for LifecycleConfig {
    fn default() -> LifecycleConfig {
        LifecycleConfig {
            boot_timeout_ms: 120_000,
        }
    }
}

impl LifecycleConfig {
    pub fn boot_timeout(mut self, timeout: Duration) -> LifecycleConfig {
        self.boot_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn boot_timeout_duration(&self) -> Duration {
        Duration::from_millis(self.boot_timeout_ms)
    }
}
