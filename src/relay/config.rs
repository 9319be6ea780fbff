//! Runtime knobs of the relay scheduler.
use crate::protocol::{CAN_RECEIVE_TIMEOUT_MS, CAN_SEND_TIMEOUT_MS};

/// What happens to a frame whose transmission keeps failing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RetryPolicy {
    /// Put the frame back at the head of its queue, forever, without backoff.
    #[default]
    Unbounded,
    /// Abandon the frame after this many consecutive failures on one path and
    /// return its buffer to the pool. `0` behaves like `1`.
    MaxAttempts(u8),
}

impl RetryPolicy {
    /// `true` once `failures` consecutive failures exhaust the policy.
    #[inline]
    pub fn is_exhausted(&self, failures: u8) -> bool {
        match self {
            RetryPolicy::Unbounded => false,
            RetryPolicy::MaxAttempts(max) => failures >= (*max).max(1),
        }
    }
}

/// Scheduler configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RelayConfig {
    /// Timeout for each transmit attempt towards the bus (ms).
    pub can_send_timeout_ms: u32,
    /// Timeout for reading a pending reception (ms).
    pub can_receive_timeout_ms: u32,
    /// Failure handling shared by the bus and host paths.
    pub retry: RetryPolicy,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            can_send_timeout_ms: CAN_SEND_TIMEOUT_MS,
            can_receive_timeout_ms: CAN_RECEIVE_TIMEOUT_MS,
            retry: RetryPolicy::Unbounded,
        }
    }
}
