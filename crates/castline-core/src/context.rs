//! Cancellation context carried by every cast.
//!
//! A context is done once its token is cancelled or its deadline passes,
//! whichever comes first. Contexts are cheap to clone; clones share the same
//! token.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::config::CastSettings;

/// Why a context is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Cancelled {
    #[error("context canceled")]
    Canceled,

    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

#[derive(Debug, Clone)]
pub struct CastContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl Default for CastContext {
    fn default() -> Self {
        Self::background()
    }
}

impl CastContext {
    /// A context that is never done unless explicitly cancelled.
    pub fn background() -> Self {
        Self::new(CancellationToken::new())
    }

    /// A context tied to an existing token, typically a shutdown token.
    pub fn new(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Apply the configured default timeout. A zero timeout means no deadline.
    pub fn from_settings(token: CancellationToken, settings: &CastSettings) -> Self {
        let ctx = Self::new(token);
        match settings.timeout() {
            Some(timeout) => ctx.with_timeout(timeout),
            None => ctx,
        }
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Set a deadline. An earlier deadline already present is kept.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        self
    }

    /// Derived context: cancelled along with `self`, but can also be
    /// cancelled on its own without affecting `self`.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// The reason this context is done, or `None` while it is still live.
    pub fn err(&self) -> Option<Cancelled> {
        if self.token.is_cancelled() {
            return Some(Cancelled::Canceled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(Cancelled::DeadlineExceeded),
            _ => None,
        }
    }

    pub fn is_done(&self) -> bool {
        self.err().is_some()
    }

    /// Resolves once the context is done. Ready on first poll if it already is.
    pub async fn cancelled(&self) -> Cancelled {
        if let Some(cause) = self.err() {
            return cause;
        }
        match self.deadline {
            Some(deadline) => tokio::select! {
                biased;
                _ = self.token.cancelled() => Cancelled::Canceled,
                _ = tokio::time::sleep_until(deadline) => Cancelled::DeadlineExceeded,
            },
            None => {
                self.token.cancelled().await;
                Cancelled::Canceled
            }
        }
    }
}
