//! Configuration data types for engine-info.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;

use crate::error::ConfigError;

/// Root application configuration.
///
/// Configuration files are discovered in this order:
/// 1. Path specified via the `ENGINE_INFO_CONFIG_PATH` environment variable
/// 2. `.engine-info.toml` in the current working directory
/// 3. `.engine-info.toml` in the home directory
/// 4. `~/.config/engine-info/config.toml` (XDG default)
#[derive(Debug, Clone, PartialEq, Eq, SmartDefault, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "ENGINE_INFO",
    discovery(
        app_name = "engine-info",
        env_var = "ENGINE_INFO_CONFIG_PATH",
        config_file_name = "config.toml",
        dotfile_name = ".engine-info.toml",
        config_cli_long = "config",
        config_cli_visible = true,
    )
)]
pub struct AppConfig {
    /// The engine program every query invokes.
    #[default(String::from("docker"))]
    pub engine_command: String,

    /// Seconds each engine probe may run.
    #[default(5)]
    pub probe_timeout_secs: u64,
}

impl AppConfig {
    /// The fixed deadline applied to each engine query.
    #[must_use]
    pub const fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    /// Validates the merged configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingRequired` when `engine_command` is blank.
    ///
    /// Returns `ConfigError::InvalidValue` when `probe_timeout_secs` is zero.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.engine_command.trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                field: String::from("engine_command"),
            }
            .into());
        }
        if self.probe_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: String::from("probe_timeout_secs"),
                reason: String::from("must be greater than zero"),
            }
            .into());
        }
        Ok(())
    }
}
