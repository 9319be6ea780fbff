//! Monotonic millisecond clock used by the liveness heartbeat.
use embassy_time::Instant;

/// Clock abstraction; must never go backwards.
pub trait Monotonic {
    /// Current uptime.
    fn now(&self) -> Instant;
}

/// Clock backed by the embassy time driver linked into the firmware.
#[cfg(feature = "time-driver")]
#[derive(Clone, Copy, Debug, Default)]
pub struct EmbassyMonotonic;

#[cfg(feature = "time-driver")]
impl Monotonic for EmbassyMonotonic {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
