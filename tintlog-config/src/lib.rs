//! # tintlog Configuration
//!
//! Layered configuration for loggers.
//!
//! ## Features
//! - **Infallible startup**: `LoggerConfig::from_env` never fails; unknown
//!   `LOG_LEVEL` values are ignored and the default level stays in place
//! - **Layered loading**: defaults, `tintlog.yaml`, then `TINTLOG_*` variables
//! - **Validation**: throttle bounds are checked with `validator`

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tintlog_core::Level;
use validator::Validate;

mod error;
mod renderer;
mod throttle;

pub use error::ConfigError;
pub use renderer::RendererKind;
pub use throttle::ThrottleConfig;

/// Variable selecting the initial level. Exact, case-sensitive level names.
pub const LEVEL_ENV: &str = "LOG_LEVEL";

/// Prefix of the layered configuration variables (`TINTLOG_THROTTLE__WINDOW_MS`).
pub const ENV_PREFIX: &str = "TINTLOG_";

/// Default configuration file looked up by [`LoggerConfig::load`].
pub const CONFIG_FILE: &str = "tintlog.yaml";

/// Top‑level configuration for a logger and everything derived from it.
#[derive(Debug, Serialize, Deserialize, Validate, Default, Clone, PartialEq)]
pub struct LoggerConfig {
    /// Minimum level that reaches the renderer.
    #[serde(default)]
    pub level: Level,

    /// Repeat-suppression parameters.
    #[serde(default)]
    #[validate(nested)]
    pub throttle: ThrottleConfig,

    /// Formatter variant.
    #[serde(default)]
    pub renderer: RendererKind,

    /// Forces terminal colors on or off. `None` follows stdout detection.
    #[serde(default)]
    pub colors: Option<bool>,
}

impl LoggerConfig {
    /// Defaults plus the `LOG_LEVEL` override. Never fails.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_level_override();
        config
    }

    /// Applies `LOG_LEVEL` when it names a level exactly; anything else is
    /// ignored.
    pub fn apply_level_override(&mut self) {
        if let Some(level) = std::env::var(LEVEL_ENV)
            .ok()
            .as_deref()
            .and_then(Level::from_env_name)
        {
            self.level = level;
        }
    }

    /// Load configuration from the default file and environment.
    ///
    /// Hierarchy:
    /// 1. Default values
    /// 2. `tintlog.yaml` in the working directory, if present
    /// 3. `TINTLOG_*` environment variables (`__` separates nested keys)
    /// 4. `LOG_LEVEL`
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(LoggerConfig::default()));

        if Path::new(CONFIG_FILE).exists() {
            figment = figment.merge(Yaml::file(CONFIG_FILE));
        }

        Self::finish(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Load configuration from a specific YAML file plus the environment.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(PathBuf::from(path)));
        }

        Self::finish(
            Figment::from(Serialized::defaults(LoggerConfig::default()))
                .merge(Yaml::file(path))
                .merge(Env::prefixed(ENV_PREFIX).split("__")),
        )
    }

    fn finish(figment: Figment) -> Result<Self, ConfigError> {
        let mut config: Self = figment.extract()?;
        config.apply_level_override();
        config.validate()?;
        Ok(config)
    }
}
