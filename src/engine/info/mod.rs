//! Engine context and CPU capacity queries.
//!
//! Both queries open with the same liveness probe, `info --format
//! "{{ .Host }}"`. Its success or failure is treated as a signal, never as an
//! error:
//!
//! - the context query returns an empty name when the probe succeeds and
//!   otherwise asks the engine for the current context name;
//! - the CPU query reads the Podman field path when the probe succeeds and
//!   the Docker field path when it fails.
//!
//! Each call issues at most two engine commands and nothing is cached.

use std::time::Duration;

use tokio::runtime::Handle;

use super::bounded::FastCommandContext;
use super::context::CommandContext;
use super::runner::CommandRunner;
use crate::error::EngineError;

/// Format used by the liveness probe.
pub const HOST_PROBE_FORMAT: &str = "{{ .Host }}";

/// Format used to resolve the current context name.
pub const CONTEXT_NAME_FORMAT: &str = "{{ .Name }}";

/// CPU-count format for Docker-flavoured engines.
///
/// Kept as shipped; Docker's field is `NCPU`, so this likely never matches.
pub const DOCKER_CPU_FORMAT: &str = "{{ .NPCU }}";

/// CPU-count format for Podman-flavoured engines.
pub const PODMAN_CPU_FORMAT: &str = "{{ .Host.CPUs }}";

/// Engine implementation inferred from the liveness probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineFlavor {
    /// The probe failed.
    Docker,
    /// The probe succeeded.
    Podman,
}

impl EngineFlavor {
    /// Classify the engine from the liveness probe result.
    #[must_use]
    pub const fn from_probe(probe_succeeded: bool) -> Self {
        if probe_succeeded {
            Self::Podman
        } else {
            Self::Docker
        }
    }

    /// The `--format` template that prints the CPU count for this flavour.
    #[must_use]
    pub const fn cpu_format(self) -> &'static str {
        match self {
            Self::Docker => DOCKER_CPU_FORMAT,
            Self::Podman => PODMAN_CPU_FORMAT,
        }
    }
}

/// Argument vector of the liveness probe.
#[must_use]
pub fn host_probe_args() -> Vec<String> {
    info_args(HOST_PROBE_FORMAT)
}

/// Argument vector resolving the current context name.
#[must_use]
pub fn context_name_args() -> Vec<String> {
    vec![
        String::from("context"),
        String::from("inspect"),
        String::from("--format"),
        String::from(CONTEXT_NAME_FORMAT),
    ]
}

/// Argument vector reading the CPU count for `flavor`.
#[must_use]
pub fn cpu_count_args(flavor: EngineFlavor) -> Vec<String> {
    info_args(flavor.cpu_format())
}

fn info_args(format: &str) -> Vec<String> {
    vec![
        String::from("info"),
        String::from("--format"),
        String::from(format),
    ]
}

/// Stateless entry points for engine queries.
pub struct EngineInfo;

impl EngineInfo {
    /// Run the liveness probe, reporting only whether it succeeded.
    async fn probe<R: CommandRunner + ?Sized>(runner: &R, fast: &FastCommandContext) -> bool {
        match runner.run(fast.context(), &host_probe_args()).await {
            Ok(()) => true,
            Err(error) => {
                tracing::debug!(%error, "engine liveness probe failed");
                false
            }
        }
    }

    /// Return the name of the active engine context (async version).
    ///
    /// When the liveness probe succeeds the engine is taken to be serving a
    /// usable context and an empty name is returned without further lookup.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::ContextSetup` if the bounded context cannot be
    /// derived.
    ///
    /// Returns `EngineError::ProbeTimeout` if the context lookup exceeds the
    /// probe deadline.
    ///
    /// Returns `EngineError::Command` if the context lookup fails otherwise.
    ///
    /// Returns `EngineError::NoContextName` if the lookup prints nothing.
    pub async fn current_context_async<R: CommandRunner + ?Sized>(
        runner: &R,
        ctx: &CommandContext,
        timeout: Duration,
    ) -> Result<String, EngineError> {
        let fast = FastCommandContext::new(ctx, timeout)?;

        if Self::probe(runner, &fast).await {
            return Ok(String::new());
        }

        let args = context_name_args();
        tracing::info!(
            program = runner.program(),
            "liveness probe failed; resolving context name"
        );
        let outcome = runner.combined_output(fast.context(), &args).await;
        let output = fast.settle(outcome, runner.program(), &args)?;

        let name = String::from_utf8_lossy(&output).trim().to_owned();
        if name.is_empty() {
            return Err(EngineError::NoContextName);
        }
        Ok(name)
    }

    /// Return the name of the active engine context.
    ///
    /// Blocks the calling thread on `runtime` until the query completes.
    ///
    /// # Errors
    ///
    /// See [`Self::current_context_async`].
    pub fn current_context<R: CommandRunner + ?Sized>(
        runtime: &Handle,
        runner: &R,
        ctx: &CommandContext,
        timeout: Duration,
    ) -> Result<String, EngineError> {
        runtime.block_on(Self::current_context_async(runner, ctx, timeout))
    }

    /// Return the number of CPU cores the engine reports (async version).
    ///
    /// # Errors
    ///
    /// Returns `EngineError::ContextSetup` if the bounded context cannot be
    /// derived.
    ///
    /// Returns `EngineError::ProbeTimeout` if the CPU query exceeds the probe
    /// deadline.
    ///
    /// Returns `EngineError::Command` if the CPU query fails otherwise.
    ///
    /// Returns `EngineError::CpuCountParse` if the output is not a base-10
    /// integer that fits in a `u32`. Negative counts are rejected.
    pub async fn cpu_count_async<R: CommandRunner + ?Sized>(
        runner: &R,
        ctx: &CommandContext,
        timeout: Duration,
    ) -> Result<u32, EngineError> {
        let fast = FastCommandContext::new(ctx, timeout)?;

        let flavor = EngineFlavor::from_probe(Self::probe(runner, &fast).await);
        tracing::debug!(?flavor, "selected cpu count format");

        let args = cpu_count_args(flavor);
        let outcome = runner.combined_output(fast.context(), &args).await;
        let output = fast.settle(outcome, runner.program(), &args)?;

        parse_cpu_count(&String::from_utf8_lossy(&output))
    }

    /// Return the number of CPU cores the engine reports.
    ///
    /// Blocks the calling thread on `runtime` until the query completes.
    ///
    /// # Errors
    ///
    /// See [`Self::cpu_count_async`].
    pub fn cpu_count<R: CommandRunner + ?Sized>(
        runtime: &Handle,
        runner: &R,
        ctx: &CommandContext,
        timeout: Duration,
    ) -> Result<u32, EngineError> {
        runtime.block_on(Self::cpu_count_async(runner, ctx, timeout))
    }
}

/// Parse CPU-count output, ignoring surrounding whitespace.
///
/// The count is unsigned: a negative value or one above `u32::MAX` is a
/// parse error rather than a count.
///
/// # Errors
///
/// Returns `EngineError::CpuCountParse` if the trimmed text is not a base-10
/// integer in `0..=u32::MAX`.
pub fn parse_cpu_count(output: &str) -> Result<u32, EngineError> {
    let trimmed = output.trim();
    trimmed
        .parse::<u32>()
        .map_err(|source| EngineError::CpuCountParse {
            output: trimmed.to_owned(),
            source,
        })
}
