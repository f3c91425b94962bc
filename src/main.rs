//! `engine-info` application entry point.
//!
//! This binary reports the active container engine context and its CPU count.
//! It uses `eyre` for opaque error handling at the application boundary,
//! converting domain-specific errors into human-readable reports.
//!
//! Configuration is loaded with layered precedence via `OrthoConfig`:
//! 1. Application defaults
//! 2. Configuration file (`~/.config/engine-info/config.toml` or path from
//!    `ENGINE_INFO_CONFIG_PATH`)
//! 3. Environment variables (`ENGINE_INFO_*`)
//! 4. Command-line arguments

use clap::Parser;
use engine_info::api::{self, ProbeParams, display_context};
use engine_info::config::{AppConfig, Cli, Commands, load_config};
use engine_info::engine::{CommandContext, SystemCommandRunner};
use engine_info::error::{EngineError, Result as EngineInfoResult};
use eyre::{Report, Result as EyreResult};
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Application entry point.
///
/// Loads configuration with layered precedence via `OrthoConfig`, then
/// dispatches to the appropriate subcommand handler.
fn main() -> EyreResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Load configuration with layered precedence: defaults < file < env < CLI.
    let config = load_config(&cli).map_err(Report::from)?;

    run(&cli, &config).map_err(Report::from)
}

/// Install the stderr subscriber.
///
/// `--verbose` forces debug output; otherwise `RUST_LOG` applies, falling
/// back to warnings only.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Execute the CLI command, returning domain-specific errors.
///
/// Keeps semantic errors inside the run loop so the CLI boundary owns
/// conversion to `eyre::Report`.
fn run(cli: &Cli, config: &AppConfig) -> EngineInfoResult<()> {
    let runtime = Runtime::new().map_err(|error| EngineError::RuntimeCreationFailed {
        message: error.to_string(),
    })?;

    let shutdown = CancellationToken::new();
    let ctx = CommandContext::with_cancellation(shutdown.clone());
    runtime.spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received; cancelling engine queries");
            shutdown.cancel();
        }
    });

    let runner = SystemCommandRunner::new(config.engine_command.as_str());
    let params = ProbeParams {
        config,
        runner: &runner,
        ctx: &ctx,
        runtime_handle: runtime.handle(),
    };

    match cli.command {
        Commands::Context => print_context(&params),
        Commands::Ncpu => print_cpu_count(&params),
        Commands::Report => print_report(&params),
    }
}

/// Print the active engine context name.
#[expect(clippy::print_stdout, reason = "CLI output is the intended behaviour")]
fn print_context(params: &ProbeParams<'_, SystemCommandRunner>) -> EngineInfoResult<()> {
    let name = api::current_context(params)?;
    println!("{}", display_context(&name));
    Ok(())
}

/// Print the engine CPU count.
#[expect(clippy::print_stdout, reason = "CLI output is the intended behaviour")]
fn print_cpu_count(params: &ProbeParams<'_, SystemCommandRunner>) -> EngineInfoResult<()> {
    let cpus = api::cpu_count(params)?;
    println!("{cpus}");
    Ok(())
}

/// Print the context name and CPU count together.
#[expect(clippy::print_stdout, reason = "CLI output is the intended behaviour")]
fn print_report(params: &ProbeParams<'_, SystemCommandRunner>) -> EngineInfoResult<()> {
    let report = api::engine_report(params)?;
    println!("{report}");
    Ok(())
}
