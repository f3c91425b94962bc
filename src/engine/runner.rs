//! Process execution seam for engine CLI commands.
//!
//! The queries never spawn processes directly. They go through
//! [`CommandRunner`], which keeps them testable without a live engine.

use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;

use tokio::process::Command;

use super::context::{CommandContext, ContextError};
use crate::error::CommandError;

/// Boxed future type returned by [`CommandRunner::run`].
pub type RunFuture<'a> = Pin<Box<dyn Future<Output = Result<(), CommandError>> + Send + 'a>>;

/// Boxed future type returned by [`CommandRunner::combined_output`].
pub type OutputFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Vec<u8>, CommandError>> + Send + 'a>>;

/// Behaviour required to invoke the container engine CLI.
pub trait CommandRunner {
    /// The engine program every command is issued against.
    fn program(&self) -> &str;

    /// Run the program with `args`, discarding output and checking only the
    /// exit status.
    fn run(&self, ctx: &CommandContext, args: &[String]) -> RunFuture<'_>;

    /// Run the program with `args` and capture stdout followed by stderr.
    fn combined_output(&self, ctx: &CommandContext, args: &[String]) -> OutputFuture<'_>;
}

/// [`CommandRunner`] backed by real child processes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemCommandRunner {
    program: String,
}

impl SystemCommandRunner {
    /// Create a runner for `program`, resolved through `PATH` when bare.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl CommandRunner for SystemCommandRunner {
    fn program(&self) -> &str {
        &self.program
    }

    fn run(&self, ctx: &CommandContext, args: &[String]) -> RunFuture<'_> {
        let ctx_owned = ctx.clone();
        let args_owned = args.to_vec();
        Box::pin(async move {
            execute(&self.program, &ctx_owned, &args_owned, Capture::Discard)
                .await
                .map(|_| ())
        })
    }

    fn combined_output(&self, ctx: &CommandContext, args: &[String]) -> OutputFuture<'_> {
        let ctx_owned = ctx.clone();
        let args_owned = args.to_vec();
        Box::pin(async move {
            execute(&self.program, &ctx_owned, &args_owned, Capture::Combined).await
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capture {
    Discard,
    Combined,
}

/// Render a program and its arguments for diagnostics.
#[must_use]
pub fn render_command(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

fn stopped(reason: ContextError, command: String) -> CommandError {
    match reason {
        ContextError::Cancelled => CommandError::Cancelled { command },
        ContextError::DeadlineExceeded => CommandError::DeadlineExceeded { command },
    }
}

async fn execute(
    program: &str,
    ctx: &CommandContext,
    args: &[String],
    capture: Capture,
) -> Result<Vec<u8>, CommandError> {
    let command = render_command(program, args);
    if let Some(reason) = ctx.err() {
        return Err(stopped(reason, command));
    }

    let mut child_command = Command::new(program);
    child_command
        .args(args)
        .stdin(Stdio::null())
        .kill_on_drop(true);
    match capture {
        Capture::Discard => child_command.stdout(Stdio::null()).stderr(Stdio::null()),
        Capture::Combined => child_command.stdout(Stdio::piped()).stderr(Stdio::piped()),
    };

    tracing::debug!(command = %command, "spawning engine command");
    let child = child_command
        .spawn()
        .map_err(|error| CommandError::SpawnFailed {
            command: command.clone(),
            message: error.to_string(),
        })?;

    // Dropping the child on the losing branch kills it.
    let output = tokio::select! {
        reason = ctx.done() => {
            tracing::debug!(command = %command, ?reason, "engine command stopped");
            return Err(stopped(reason, command));
        }
        output = child.wait_with_output() => output.map_err(|error| CommandError::SpawnFailed {
            command: command.clone(),
            message: error.to_string(),
        })?,
    };

    let mut combined = output.stdout;
    combined.extend_from_slice(&output.stderr);
    tracing::debug!(
        command = %command,
        status = %output.status,
        bytes = combined.len(),
        "engine command finished"
    );

    if output.status.success() {
        Ok(combined)
    } else {
        Err(CommandError::Failed {
            command,
            status: output.status.to_string(),
            output: String::from_utf8_lossy(&combined).into_owned(),
        })
    }
}
