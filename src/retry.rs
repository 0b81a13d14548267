use std::time::Duration;

/// Bounded constant-delay retry rule for a descriptor.
///
/// `max_attempts` counts transport calls in total, the first one included;
/// the delay between attempts is constant — no jitter, no exponential
/// growth. The policy itself is an immutable description: per-call attempt
/// tracking lives in [`RetryState`], created fresh for every `execute`, so
/// sharing one policy value across descriptors is safe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total transport calls allowed, at least 1.
    pub max_attempts: u32,
    /// Wait between a failed attempt and the next one.
    pub delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy allowing `max_attempts` total transport calls with
    /// no delay between them. Values below 1 are clamped to 1.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay: Duration::ZERO,
        }
    }

    /// Sets the constant delay between attempts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3)
    }
}

/// Attempt tracker owned by one in-flight call.
#[derive(Clone, Copy, Debug)]
pub(crate) struct RetryState {
    policy: RetryPolicy,
    attempt: u32,
}

impl RetryState {
    pub(crate) fn new(policy: RetryPolicy) -> Self {
        Self { policy, attempt: 1 }
    }

    /// Consumes one attempt slot after a failed transport call.
    ///
    /// Returns the delay to wait before re-attempting, or `None` once
    /// attempts are exhausted.
    pub(crate) fn next_delay(&mut self) -> Option<Duration> {
        if self.attempt >= self.policy.max_attempts {
            return None;
        }
        self.attempt += 1;
        Some(self.policy.delay)
    }
}
