//! Configuration loading with layered precedence.
//!
//! Layers are composed manually with `MergeComposer` rather than through the
//! derive-generated `load()`:
//!
//! 1. **Subcommand separation**: `Cli` owns subcommand dispatch via clap,
//!    while `AppConfig` only holds configuration values.
//! 2. **Fail-fast environment parsing**: typed environment variables with
//!    unparseable values are rejected instead of silently ignored.
//! 3. **Testable environment access**: variables are read through a
//!    `mockable::Env` so tests never touch the process environment.
//!
//! # Environment Variables
//!
//! `ENGINE_INFO_ENGINE_COMMAND` is always accepted. `ENGINE_INFO_PROBE_TIMEOUT_SECS`
//! must be an unsigned integer or loading fails with a clear error.

use camino::Utf8PathBuf;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use mockable::{DefaultEnv, Env};
use ortho_config::discovery::ConfigDiscovery;
use ortho_config::serde_json::{self, Map, Value};
use ortho_config::{MergeComposer, toml};

use crate::config::{AppConfig, Cli};
use crate::error::{ConfigError, Result};

/// The type of value expected from an environment variable.
#[derive(Clone, Copy)]
enum EnvVarType {
    /// String value (always accepted).
    String,
    /// Unsigned 64-bit integer. Invalid values return an error.
    U64,
}

/// Specification for a single environment variable mapping.
struct EnvVarSpec {
    /// The environment variable name.
    env_var: &'static str,
    /// The configuration field it populates.
    field: &'static str,
    /// The expected value type.
    var_type: EnvVarType,
}

const ENV_VAR_SPECS: &[EnvVarSpec] = &[
    EnvVarSpec {
        env_var: "ENGINE_INFO_ENGINE_COMMAND",
        field: "engine_command",
        var_type: EnvVarType::String,
    },
    EnvVarSpec {
        env_var: "ENGINE_INFO_PROBE_TIMEOUT_SECS",
        field: "probe_timeout_secs",
        var_type: EnvVarType::U64,
    },
];

/// Returns the list of environment variable names recognised by the loader.
///
/// Tests that need to clear `ENGINE_INFO_*` variables should use this rather
/// than a hard-coded list.
#[must_use]
pub fn env_var_names() -> Vec<&'static str> {
    ENV_VAR_SPECS.iter().map(|spec| spec.env_var).collect()
}

/// Load a configuration file and push it to the composer.
///
/// The parent directory is opened through `cap_std::fs_utf8` and the file is
/// read relative to it.
fn load_config_file(path: &Utf8PathBuf, composer: &mut MergeComposer) -> Result<()> {
    let current_dir = Utf8PathBuf::from(".");
    let parent = path
        .parent()
        .filter(|dir| !dir.as_str().is_empty())
        .unwrap_or_else(|| current_dir.as_ref());
    let file_name = path.file_name().unwrap_or(path.as_str());

    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|e| {
        ConfigError::ParseError {
            message: format!("failed to open directory {parent}: {e}"),
        }
    })?;

    let content = dir
        .read_to_string(file_name)
        .map_err(|e| ConfigError::ParseError {
            message: format!("failed to read {path}: {e}"),
        })?;

    let value =
        toml::from_str::<serde_json::Value>(&content).map_err(|e| ConfigError::ParseError {
            message: format!("failed to parse {path}: {e}"),
        })?;

    composer.push_file(value, Some(path.clone()));
    Ok(())
}

/// Load configuration from the process environment with full layer precedence.
///
/// # Errors
///
/// See [`load_config_with_env`].
pub fn load_config(cli: &Cli) -> Result<AppConfig> {
    load_config_with_env(cli, &DefaultEnv::new())
}

/// Load configuration with full layer precedence, reading variables from `env`.
///
/// Layers, lowest to highest:
/// 1. Application defaults
/// 2. Configuration file (`--config`, or discovered via `ENGINE_INFO_CONFIG_PATH`
///    and XDG paths)
/// 3. `ENGINE_INFO_*` environment variables
/// 4. Command-line flags
///
/// # Errors
///
/// Returns `ConfigError` if:
/// - an explicit `--config` path does not exist
/// - a configuration file is malformed
/// - a typed environment variable cannot be parsed
/// - the merged configuration fails validation
pub fn load_config_with_env<E: Env>(cli: &Cli, env: &E) -> Result<AppConfig> {
    let mut composer = MergeComposer::new();

    let defaults =
        serde_json::to_value(AppConfig::default()).map_err(|e| ConfigError::ParseError {
            message: format!("failed to serialise defaults: {e}"),
        })?;
    composer.push_defaults(defaults);

    let config_path = match cli.config.clone() {
        Some(path) if path.exists() => Some(path),
        Some(path) => {
            return Err(ConfigError::FileNotFound {
                path: path.into_std_path_buf(),
            }
            .into());
        }
        None => discover_config_file(),
    };

    if let Some(ref path) = config_path {
        tracing::debug!(%path, "loading configuration file");
        load_config_file(path, &mut composer)?;
    }

    let env_values = collect_env_vars(env)?;
    if !env_values.is_null() {
        composer.push_environment(env_values);
    }

    let cli_overrides = build_cli_overrides(cli);
    if !cli_overrides.is_null() {
        composer.push_cli(cli_overrides);
    }

    let config =
        AppConfig::merge_from_layers(composer.layers()).map_err(ConfigError::OrthoConfig)?;
    config.validate()?;
    Ok(config)
}

fn discover_config_file() -> Option<Utf8PathBuf> {
    let discovery = ConfigDiscovery::builder("engine-info")
        .env_var("ENGINE_INFO_CONFIG_PATH")
        .config_file_name("config.toml")
        .dotfile_name(".engine-info.toml")
        .build();
    discovery
        .candidates()
        .into_iter()
        .filter(|p| p.exists())
        .find_map(|p| Utf8PathBuf::try_from(p).ok())
}

/// Collect `ENGINE_INFO_*` variables into a JSON object.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` if a typed variable has an unparseable
/// value.
fn collect_env_vars<E: Env>(env: &E) -> Result<Value> {
    let mut root = Map::new();

    for spec in ENV_VAR_SPECS {
        let Some(raw_value) = env.string(spec.env_var) else {
            continue;
        };

        let json_value = match spec.var_type {
            EnvVarType::String => Value::String(raw_value),
            EnvVarType::U64 => match raw_value.trim().parse::<u64>() {
                Ok(n) => Value::Number(n.into()),
                Err(_) => {
                    return Err(ConfigError::InvalidValue {
                        field: spec.env_var.to_owned(),
                        reason: format!("expected unsigned integer, got '{raw_value}'"),
                    }
                    .into());
                }
            },
        };

        root.insert(spec.field.to_owned(), json_value);
    }

    if root.is_empty() {
        Ok(Value::Null)
    } else {
        Ok(Value::Object(root))
    }
}

/// Build a JSON value containing CLI overrides.
fn build_cli_overrides(cli: &Cli) -> Value {
    let mut overrides = Map::new();

    if let Some(ref command) = cli.engine_command {
        overrides.insert(
            "engine_command".to_owned(),
            Value::String(command.clone()),
        );
    }

    if let Some(secs) = cli.probe_timeout_secs {
        overrides.insert("probe_timeout_secs".to_owned(), Value::Number(secs.into()));
    }

    if overrides.is_empty() {
        Value::Null
    } else {
        Value::Object(overrides)
    }
}
