//! Orchestration API for engine-info commands.
//!
//! These functions hold the logic behind each subcommand so it is available
//! to both the CLI adapter and library embedders. They accept library-owned
//! types, block on the supplied runtime, and never print.

use std::fmt;

use tokio::runtime::Handle;

use crate::config::AppConfig;
use crate::engine::{CommandContext, CommandRunner, EngineInfo};
use crate::error::Result as EngineInfoResult;

/// Parameters shared by every engine query.
pub struct ProbeParams<'a, R: CommandRunner + ?Sized> {
    /// Application configuration (provides the probe timeout).
    pub config: &'a AppConfig,
    /// Process execution capability for the engine program.
    pub runner: &'a R,
    /// Ambient cancellation and deadline for the whole operation.
    pub ctx: &'a CommandContext,
    /// Tokio runtime handle for blocking execution.
    pub runtime_handle: &'a Handle,
}

/// Context name and CPU capacity reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineReport {
    /// Active context name; empty when the liveness probe sufficed.
    pub context: String,
    /// CPU cores available to the engine.
    pub cpus: u32,
}

impl fmt::Display for EngineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "context: {}", display_context(&self.context))?;
        write!(f, "cpus: {}", self.cpus)
    }
}

/// Render a context name, substituting a marker for the unresolved case.
#[must_use]
pub const fn display_context(name: &str) -> &str {
    if name.is_empty() { "(not resolved)" } else { name }
}

/// Resolve the active engine context name.
///
/// # Errors
///
/// Returns `EngineError` variants from [`EngineInfo::current_context`].
pub fn current_context<R: CommandRunner + ?Sized>(
    params: &ProbeParams<'_, R>,
) -> EngineInfoResult<String> {
    Ok(EngineInfo::current_context(
        params.runtime_handle,
        params.runner,
        params.ctx,
        params.config.probe_timeout(),
    )?)
}

/// Read the number of CPU cores the engine reports.
///
/// # Errors
///
/// Returns `EngineError` variants from [`EngineInfo::cpu_count`].
pub fn cpu_count<R: CommandRunner + ?Sized>(params: &ProbeParams<'_, R>) -> EngineInfoResult<u32> {
    Ok(EngineInfo::cpu_count(
        params.runtime_handle,
        params.runner,
        params.ctx,
        params.config.probe_timeout(),
    )?)
}

/// Run the context query and then the CPU query.
///
/// The queries run one after the other, each under its own probe deadline.
///
/// # Errors
///
/// Returns the first error produced by either query.
pub fn engine_report<R: CommandRunner + ?Sized>(
    params: &ProbeParams<'_, R>,
) -> EngineInfoResult<EngineReport> {
    let context = current_context(params)?;
    let cpus = cpu_count(params)?;
    Ok(EngineReport { context, cpus })
}
