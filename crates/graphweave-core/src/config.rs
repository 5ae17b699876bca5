//! Configuration loading for graphweave.
//!
//! Values are layered with figment: built-in defaults, then an optional TOML
//! file, then `GRAPHWEAVE_`-prefixed environment variables (nested keys are
//! separated by a double underscore, e.g. `GRAPHWEAVE_RELAXER__SLEEP_MS=20`).
//!
//! ```toml
//! [relaxer]
//! sleep_ms = 50
//! prerelax_budget_ms = 250
//!
//! [pagerank]
//! alpha = 0.2
//! max_iterations = 200
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::algorithms::pagerank::PageRankConfig;

/// Prefix of environment variables read by [`GraphweaveConfig::load`].
pub const ENV_PREFIX: &str = "GRAPHWEAVE_";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The requested configuration file does not exist.
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    /// A provider failed or a value has the wrong type.
    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    /// A value is outside its allowed range.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Load(Box::new(err))
    }
}

/// Pacing and shutdown parameters of a [`Relaxer`](crate::relax::Relaxer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelaxerConfig {
    /// Pause between two background steps, in milliseconds.
    /// Default: 100
    pub sleep_ms: u64,

    /// Wall-clock budget of a synchronous `prerelax()` burst, in milliseconds.
    /// 0 disables the burst.
    /// Default: 500
    pub prerelax_budget_ms: u64,

    /// How long `stop()` waits for the worker to exit before returning.
    /// Default: 1000
    pub stop_grace_ms: u64,
}

impl Default for RelaxerConfig {
    fn default() -> Self {
        Self {
            sleep_ms: 100,
            prerelax_budget_ms: 500,
            stop_grace_ms: 1000,
        }
    }
}

impl RelaxerConfig {
    /// Pacing interval as a [`Duration`].
    #[must_use]
    pub const fn sleep_time(&self) -> Duration {
        Duration::from_millis(self.sleep_ms)
    }

    /// Prerelax budget as a [`Duration`].
    #[must_use]
    pub const fn prerelax_budget(&self) -> Duration {
        Duration::from_millis(self.prerelax_budget_ms)
    }

    /// Stop grace period as a [`Duration`].
    #[must_use]
    pub const fn stop_grace(&self) -> Duration {
        Duration::from_millis(self.stop_grace_ms)
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphweaveConfig {
    /// Background relaxation settings.
    pub relaxer: RelaxerConfig,
    /// Default PageRank parameters.
    pub pagerank: PageRankConfig,
}

impl GraphweaveConfig {
    /// Loads defaults, then `path`, then the environment, and validates.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::FileNotFound` if `path` does not exist,
    /// `ConfigError::Load` on malformed input and `ConfigError::Invalid` if
    /// validation fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }
        let config: Self = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        config.validate()?;
        tracing::debug!(path = %path.display(), ?config, "Loaded configuration");
        Ok(config)
    }

    /// Loads defaults overridden by the environment only.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Load` or `ConfigError::Invalid`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config: Self = Figment::from(Serialized::defaults(Self::default()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a TOML document over the defaults. The environment is ignored.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Load` or `ConfigError::Invalid`.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let config: Self = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::string(toml))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every value against its allowed range.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` describing the first offending value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pagerank
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("pagerank: {e}")))?;
        if self.relaxer.stop_grace_ms == 0 {
            return Err(ConfigError::Invalid(
                "relaxer: stop_grace_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
