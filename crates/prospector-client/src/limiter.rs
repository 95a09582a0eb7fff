//! Admission-window rate limiting.
//!
//! At most `concurrency` request *starts* are admitted per `interval_ms`
//! window. This is refill-per-window gating, not a fixed-size pool: how
//! long an admitted request runs has no bearing on later admissions, and
//! retries of an already-admitted call do not pass through here again.

use prospector_core::RateLimitPolicy;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

#[derive(Debug)]
struct WindowState {
    window_start: Option<Instant>,
    admitted: u32,
}

/// Gate admitting a bounded number of operations per time window.
#[derive(Debug)]
pub struct AdmissionGate {
    policy: RateLimitPolicy,
    state: Mutex<WindowState>,
}

impl AdmissionGate {
    /// Create a gate for the given policy.
    #[must_use]
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self {
            policy,
            state: Mutex::new(WindowState {
                window_start: None,
                admitted: 0,
            }),
        }
    }

    /// The policy this gate enforces.
    #[must_use]
    pub fn policy(&self) -> RateLimitPolicy {
        self.policy
    }

    /// Wait until the caller may start its operation.
    ///
    /// The state lock is held across the sleep to the window boundary, so
    /// waiters are released in submission order (the tokio mutex queues
    /// fairly). Nothing could be admitted during that sleep anyway: the
    /// window is full until it rolls over.
    pub async fn admit(&self) {
        let interval = Duration::from_millis(self.policy.interval_ms);
        let mut state = self.state.lock().await;
        loop {
            let now = Instant::now();
            let in_window = state
                .window_start
                .is_some_and(|start| now.duration_since(start) < interval);

            if !in_window {
                state.window_start = Some(now);
                state.admitted = 1;
                return;
            }
            if state.admitted < self.policy.concurrency {
                state.admitted += 1;
                return;
            }

            let start = state.window_start.unwrap_or(now);
            let wait = interval.saturating_sub(now.duration_since(start));
            tracing::debug!(wait_ms = wait.as_millis() as u64, "admission window full");
            tokio::time::sleep(wait).await;
        }
    }
}
