//! Configuration system for engine-info.
//!
//! Configuration loading and precedence merging is handled by the
//! `ortho_config` crate. Precedence (lowest to highest): defaults,
//! configuration file, environment variables, command-line flags.
//!
//! The configuration file is expected at `~/.config/engine-info/config.toml`
//! by default.
//!
//! # Example Configuration
//!
//! ```toml
//! engine_command = "podman"
//! probe_timeout_secs = 10
//! ```

mod cli;
mod loader;
mod types;


pub use cli::{Cli, Commands};
pub use loader::{env_var_names, load_config, load_config_with_env};
pub use types::AppConfig;
