//! Container engine queries over the engine CLI.
//!
//! The engine is never contacted through its API socket. Every query shells
//! out to the engine program (`docker` by default, which Podman commonly
//! provides as a compatible front-end) under a short, fixed deadline:
//!
//! 1. [`CommandContext`] carries ambient cancellation and deadlines.
//! 2. [`FastCommandContext`] bounds each query by the probe timeout and turns
//!    deadline expiry into [`crate::error::EngineError::ProbeTimeout`].
//! 3. [`CommandRunner`] is the process execution seam, implemented for real
//!    processes by [`SystemCommandRunner`].
//! 4. [`EngineInfo`] runs the context and CPU queries.

mod bounded;
mod context;
mod info;
mod runner;

pub use bounded::{DEFAULT_PROBE_TIMEOUT, FastCommandContext};
pub use context::{CommandContext, ContextError};
pub use info::{
    CONTEXT_NAME_FORMAT, DOCKER_CPU_FORMAT, EngineFlavor, EngineInfo, HOST_PROBE_FORMAT,
    PODMAN_CPU_FORMAT, context_name_args, cpu_count_args, host_probe_args, parse_cpu_count,
};
pub use runner::{CommandRunner, OutputFuture, RunFuture, SystemCommandRunner, render_command};
