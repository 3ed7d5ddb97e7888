use std::{future::Future, time::Duration};

use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;

/// Why a guarded call did not complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    DeadlineExceeded,
    Canceled,
}

/// Deadline and cancellation shared by every network call of one run.
///
/// The deadline is fixed at construction and never extended, so time spent in
/// an earlier call is gone for the later ones. Clones share the cancellation
/// token, so a clone handed to a signal handler can abort the run.
#[derive(Debug, Clone)]
pub struct RunContext {
    deadline: Instant,
    cancel: CancellationToken,
}

impl RunContext {
    pub fn with_timeout(budget: Duration) -> Self {
        Self::with_deadline(Instant::now() + budget)
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline,
            cancel: CancellationToken::new(),
        }
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_canceled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Checks the context without waiting.
    pub fn check(&self) -> Result<(), Interrupt> {
        if self.is_canceled() {
            Err(Interrupt::Canceled)
        } else if Instant::now() >= self.deadline {
            Err(Interrupt::DeadlineExceeded)
        } else {
            Ok(())
        }
    }

    /// Runs `fut` until it completes, the deadline passes, or the run is canceled.
    pub async fn guard<F: Future>(&self, fut: F) -> Result<F::Output, Interrupt> {
        self.check()?;

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(Interrupt::Canceled),
            _ = sleep_until(self.deadline) => Err(Interrupt::DeadlineExceeded),
            out = fut => Ok(out),
        }
    }
}
