//! Bounded command execution for fast engine probes.
//!
//! Every probe runs under a child context with the same short deadline. When
//! that deadline elapses the raw command failure is reclassified as
//! [`EngineError::ProbeTimeout`], naming exactly what hung.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::DropGuard;

use super::context::{CommandContext, ContextError};
use crate::error::{CommandError, EngineError};

/// Default deadline applied to each engine probe.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// A child context bounded by the probe deadline.
///
/// The child keeps the parent's deadline when that is earlier, so the time
/// actually granted (the budget) can be shorter than the probe timeout.
///
/// Dropping the value cancels the child context, including on early return
/// and unwinding.
#[derive(Debug)]
pub struct FastCommandContext {
    ctx: CommandContext,
    timeout: Duration,
    budget: Duration,
    _release: DropGuard,
}

impl FastCommandContext {
    /// Derive a bounded child of `parent` that expires after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::ContextSetup` when the deadline cannot be
    /// represented.
    pub fn new(parent: &CommandContext, timeout: Duration) -> Result<Self, EngineError> {
        let now = Instant::now();
        let (ctx, release) =
            parent
                .child_with_timeout(timeout)
                .ok_or_else(|| EngineError::ContextSetup {
                    message: format!("deadline {timeout:?} from now is out of range"),
                })?;
        let budget = ctx
            .deadline()
            .map_or(timeout, |deadline| {
                deadline.saturating_duration_since(now).min(timeout)
            });

        Ok(Self {
            ctx,
            timeout,
            budget,
            _release: release,
        })
    }

    /// The bounded context to pass to the command runner.
    #[must_use]
    pub const fn context(&self) -> &CommandContext {
        &self.ctx
    }

    /// The fixed deadline this context was derived with.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Time the child was granted: the probe timeout, or less when the
    /// parent's deadline falls first.
    #[must_use]
    pub const fn budget(&self) -> Duration {
        self.budget
    }

    /// Returns whether a command outcome should be treated as a timeout.
    ///
    /// Either the command itself reported deadline expiry or the bounded
    /// context has passed its deadline.
    #[must_use]
    pub fn is_deadline_exceeded(&self, error: Option<&CommandError>) -> bool {
        error.is_some_and(CommandError::is_deadline_exceeded)
            || self.ctx.err() == Some(ContextError::DeadlineExceeded)
    }

    /// Build the timeout error for `program` invoked with `args`.
    #[must_use]
    pub fn timeout_error(&self, program: &str, args: &[String]) -> EngineError {
        EngineError::ProbeTimeout {
            program: String::from(program),
            args: args.to_vec(),
            timeout: self.budget,
        }
    }

    /// Settle a follow-up command outcome.
    ///
    /// Deadline expiry becomes [`EngineError::ProbeTimeout`]; any other
    /// failure is passed through unchanged.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::ProbeTimeout` or `EngineError::Command`.
    pub fn settle<T>(
        &self,
        outcome: Result<T, CommandError>,
        program: &str,
        args: &[String],
    ) -> Result<T, EngineError> {
        if self.is_deadline_exceeded(outcome.as_ref().err()) {
            tracing::warn!(
                program,
                ?args,
                timeout = ?self.timeout,
                budget = ?self.budget,
                "engine command timed out"
            );
            return Err(self.timeout_error(program, args));
        }
        outcome.map_err(EngineError::from)
    }
}
