//! Liveness heartbeat: toggles two indicator outputs on a fixed period,
//! independently of frame traffic.
//!
//! The next deadline is `now + period` at each firing rather than a fixed
//! phase, so heavy relay load stretches the period instead of bunching
//! toggles together.
use embassy_time::{Duration, Instant};
use embedded_hal::digital::OutputPin;

use crate::protocol::{HEARTBEAT_FIRST_DEADLINE_MS, HEARTBEAT_PERIOD_MS};

/// Heartbeat timing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeartbeatConfig {
    /// Delay between two toggles.
    pub period: Duration,
    /// Uptime of the first toggle.
    pub first_deadline: Instant,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_millis(HEARTBEAT_PERIOD_MS),
            first_deadline: Instant::from_millis(HEARTBEAT_FIRST_DEADLINE_MS),
        }
    }
}

/// Two indicators driven in opposite phase.
pub struct Heartbeat<A: OutputPin, B: OutputPin> {
    led_a: A,
    led_b: B,
    period: Duration,
    next_deadline: Instant,
    /// `true` while indicator A is driven high.
    a_high: bool,
    toggles: u32,
}

impl<A: OutputPin, B: OutputPin> Heartbeat<A, B> {
    /// Take the pins and drive the start-up pattern: A high, B low.
    pub fn new(led_a: A, led_b: B, config: HeartbeatConfig) -> Self {
        let mut heartbeat = Self {
            led_a,
            led_b,
            period: config.period,
            next_deadline: config.first_deadline,
            a_high: true,
            toggles: 0,
        };
        heartbeat.apply();
        heartbeat
    }

    /// Toggle both indicators if the deadline has passed. Never blocks.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.next_deadline {
            return false;
        }
        self.next_deadline = now + self.period;
        self.a_high = !self.a_high;
        self.toggles = self.toggles.wrapping_add(1);
        self.apply();
        true
    }

    pub fn next_deadline(&self) -> Instant {
        self.next_deadline
    }

    /// Number of toggles since start-up.
    pub fn toggles(&self) -> u32 {
        self.toggles
    }

    /// Give the pins back.
    pub fn release(self) -> (A, B) {
        (self.led_a, self.led_b)
    }

    fn apply(&mut self) {
        let (a, b) = if self.a_high {
            (self.led_a.set_high(), self.led_b.set_low())
        } else {
            (self.led_a.set_low(), self.led_b.set_high())
        };
        // Indicator faults never stop the relay.
        if a.is_err() || b.is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("Heartbeat indicator write failed");
        }
    }
}
