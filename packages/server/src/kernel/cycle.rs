//! Per-cycle cancellation and deadline.
//!
//! A [`CycleContext`] carries the process shutdown signal (as a child
//! [`CancellationToken`]) together with the absolute deadline of the current
//! ingest cycle. Anything that waits on the network or sleeps between
//! attempts races its work against [`CycleContext::interrupted`].

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Why a cycle stopped early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    /// Shutdown was requested.
    Cancelled,
    /// The cycle ran past its deadline.
    DeadlineExceeded,
}

#[derive(Debug, Clone)]
pub struct CycleContext {
    cancel: CancellationToken,
    deadline: Instant,
}

impl CycleContext {
    /// Create a context that expires `timeout` from now.
    ///
    /// `cancel` should be a child of the process shutdown token so that
    /// cancelling the cycle never cancels the parent.
    pub fn new(cancel: CancellationToken, timeout: Duration) -> Self {
        Self {
            cancel,
            deadline: Instant::now() + timeout,
        }
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Resolve as soon as the cycle is cancelled or out of time.
    pub async fn interrupted(&self) -> Interrupt {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Interrupt::Cancelled,
            _ = tokio::time::sleep_until(self.deadline) => Interrupt::DeadlineExceeded,
        }
    }

    /// Non-blocking check for an interrupt that has already fired.
    pub fn check(&self) -> Option<Interrupt> {
        if self.cancel.is_cancelled() {
            Some(Interrupt::Cancelled)
        } else if Instant::now() >= self.deadline {
            Some(Interrupt::DeadlineExceeded)
        } else {
            None
        }
    }
}
