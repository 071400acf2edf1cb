//! Sliding-window rate limiter for outbound provider calls.
//!
//! Keeps provider usage under free-tier quotas: at most `max_requests`
//! admissions inside any trailing window of `window` duration. The
//! check-and-insert step runs under one async mutex so two concurrent
//! callers can never both claim the last free slot. Waiters are woken in
//! whatever order the mutex grants — admission order among waiters is not
//! FIFO, which is fine because photo processing order carries no meaning.

use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Default quota matching typical free-tier provider limits.
pub const DEFAULT_MAX_REQUESTS: usize = 10;
/// Default rolling window duration.
pub const DEFAULT_WINDOW: Duration = Duration::from_millis(60_000);

/// Snapshot of window occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimiterStatus {
    /// Admissions inside the current window
    pub requests: usize,
    /// Configured quota
    pub max: usize,
    /// Free slots remaining
    pub remaining: usize,
}

/// Rolling-window rate limiter.
pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    /// Admission timestamps, oldest first; pruned lazily on each check.
    timestamps: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            timestamps: Mutex::new(VecDeque::new()),
        }
    }

    /// Suspend until a call may proceed, then record the admission.
    ///
    /// Re-evaluates from scratch after each wait: other timestamps may have
    /// expired in the meantime, or another waiter may have taken the slot
    /// this one was sleeping for.
    pub async fn check_limit(&self) {
        loop {
            let wait = {
                let mut timestamps = self.timestamps.lock().await;
                let now = Instant::now();
                while timestamps
                    .front()
                    .is_some_and(|ts| now.duration_since(*ts) >= self.window)
                {
                    timestamps.pop_front();
                }

                if timestamps.len() < self.max_requests {
                    timestamps.push_back(now);
                    return;
                }

                match timestamps.front() {
                    Some(oldest) => self.window - now.duration_since(*oldest),
                    // Unreachable with max_requests >= 1 (config validation
                    // rejects 0), but don't spin if it happens.
                    None => self.window,
                }
            };

            tracing::debug!("rate limit reached, waiting {}ms", wait.as_millis());
            tokio::time::sleep(wait).await;
        }
    }

    /// Current window occupancy without recording an admission.
    pub async fn status(&self) -> LimiterStatus {
        let timestamps = self.timestamps.lock().await;
        let now = Instant::now();
        let requests = timestamps
            .iter()
            .filter(|ts| now.duration_since(**ts) < self.window)
            .count();
        LimiterStatus {
            requests,
            max: self.max_requests,
            remaining: self.max_requests.saturating_sub(requests),
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW)
    }
}
