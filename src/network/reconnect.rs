//! Single-slot reconnection timer.
//!
//! At most one reconnection is ever pending: scheduling again replaces the
//! previous deadline instead of adding a second one.

use std::time::Duration;
use tokio::time::{Instant, sleep_until};

/// Default delay between a drop and the next connection attempt.
pub const RECONNECT_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug)]
pub struct ReconnectTimer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl ReconnectTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Change the delay. A pending deadline keeps its original time.
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Arm the timer `delay` from now. Returns `true` if a pending deadline
    /// was replaced.
    pub fn schedule(&mut self) -> bool {
        self.deadline
            .replace(Instant::now() + self.delay)
            .is_some()
    }

    /// Disarm the timer. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Resolve when the pending deadline passes, disarming the timer.
    /// Never resolves while disarmed.
    ///
    /// Cancel safe: dropping the future leaves the deadline armed.
    pub async fn fired(&mut self) {
        match self.deadline {
            Some(deadline) => {
                sleep_until(deadline).await;
                self.deadline = None;
            }
            None => std::future::pending::<()>().await,
        }
    }
}

impl Default for ReconnectTimer {
    fn default() -> Self {
        Self::new(RECONNECT_DELAY)
    }
}
