//! Cancellable command contexts with optional deadlines.
//!
//! A [`CommandContext`] carries a cancellation token and an optional deadline.
//! Child contexts inherit both: cancelling a parent cancels every child, and a
//! child's deadline never extends beyond its parent's.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::{CancellationToken, DropGuard};

/// Why a context stopped accepting work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextError {
    /// The context, or one of its ancestors, was cancelled.
    Cancelled,
    /// The context deadline elapsed.
    DeadlineExceeded,
}

/// Ambient cancellation and deadline information for engine commands.
#[derive(Debug, Clone, Default)]
pub struct CommandContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl CommandContext {
    /// Create a root context that is never cancelled and has no deadline.
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    /// Create a root context driven by an existing cancellation token.
    #[must_use]
    pub const fn with_cancellation(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Return a copy of this context bounded by `deadline`.
    ///
    /// An earlier deadline already carried by the context is kept.
    #[must_use]
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        Self {
            token: self.token.clone(),
            deadline: Some(earliest(self.deadline, deadline)),
        }
    }

    /// Derive a child context that expires `timeout` from now.
    ///
    /// The returned guard cancels the child when dropped. Returns `None` when
    /// the deadline cannot be represented.
    #[must_use]
    pub fn child_with_timeout(&self, timeout: Duration) -> Option<(Self, DropGuard)> {
        let bound = Instant::now().checked_add(timeout)?;
        let token = self.token.child_token();
        let guard = token.clone().drop_guard();
        let child = Self {
            token,
            deadline: Some(earliest(self.deadline, bound)),
        };
        Some((child, guard))
    }

    /// The instant at which this context expires, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// The cancellation token backing this context.
    #[must_use]
    pub const fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Report why the context is done, or `None` while it is still live.
    ///
    /// Deadline expiry takes precedence over cancellation so a child released
    /// after its deadline still reports the deadline.
    #[must_use]
    pub fn err(&self) -> Option<ContextError> {
        if self
            .deadline
            .is_some_and(|deadline| deadline <= Instant::now())
        {
            return Some(ContextError::DeadlineExceeded);
        }
        self.token
            .is_cancelled()
            .then_some(ContextError::Cancelled)
    }

    /// Wait until the context is cancelled or its deadline elapses.
    pub async fn done(&self) -> ContextError {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    () = self.token.cancelled() => {
                        self.err().unwrap_or(ContextError::Cancelled)
                    }
                    () = tokio::time::sleep_until(deadline) => ContextError::DeadlineExceeded,
                }
            }
            None => {
                self.token.cancelled().await;
                ContextError::Cancelled
            }
        }
    }
}

fn earliest(current: Option<Instant>, candidate: Instant) -> Instant {
    current.map_or(candidate, |existing| existing.min(candidate))
}
