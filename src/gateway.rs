//! Gateway main loop: the relay scheduler plus the liveness heartbeat,
//! wired to hardware handles that are borrowed, never global.
//!
//! Each iteration performs, in this order: one host → bus step, one bus → host
//! step, one bus ingestion step, and a heartbeat check. None of them waits
//! longer than the transceiver timeouts in [`RelayConfig`](crate::relay::RelayConfig).
use embedded_hal::digital::OutputPin;

use crate::error::SubmitError;
use crate::heartbeat::Heartbeat;
use crate::protocol::host_frame::HostFrame;
use crate::protocol::traits::{
    can_transceiver::CanTransceiver, monotonic::Monotonic, usb_transport::UsbTransport,
};
use crate::relay::{FrameRelay, StepReport};

/// Result of one loop iteration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LoopReport {
    pub relay: StepReport,
    /// `true` when the heartbeat toggled during this iteration.
    pub heartbeat: bool,
}

/// Drive the transceiver standby pin low once at start-up (normal mode).
pub fn enable_transceiver<P: OutputPin>(standby: &mut P) {
    if standby.set_low().is_err() {
        #[cfg(feature = "defmt")]
        defmt::warn!("Transceiver standby pin write failed");
    }
}

/// Cooperative gateway over a pool of `N` buffers.
pub struct Gateway<'a, C, U, M, A, B, const N: usize>
where
    C: CanTransceiver,
    U: UsbTransport,
    M: Monotonic,
    A: OutputPin,
    B: OutputPin,
{
    relay: FrameRelay<N>,
    can: &'a mut C,
    usb: &'a mut U,
    clock: &'a M,
    heartbeat: Heartbeat<A, B>,
}

impl<'a, C, U, M, A, B, const N: usize> Gateway<'a, C, U, M, A, B, N>
where
    C: CanTransceiver,
    U: UsbTransport,
    M: Monotonic,
    A: OutputPin,
    B: OutputPin,
{
    pub fn new(
        relay: FrameRelay<N>,
        can: &'a mut C,
        usb: &'a mut U,
        clock: &'a M,
        heartbeat: Heartbeat<A, B>,
    ) -> Self {
        Self {
            relay,
            can,
            usb,
            clock,
            heartbeat,
        }
    }

    /// Bring the transceiver onto the bus. Call once before polling.
    pub fn init(&mut self) -> Result<(), C::Error> {
        self.can.init().inspect_err(|_err| {
            #[cfg(feature = "defmt")]
            defmt::error!("CAN init failed: {}", defmt::Debug2Format(_err));
        })
    }

    /// Hand a raw bulk-OUT record from the host to the relay.
    pub fn submit_from_host(&mut self, raw: &[u8]) -> Result<(), SubmitError> {
        self.relay.submit_from_host(raw)
    }

    /// Hand a decoded host record to the relay.
    pub fn submit(&mut self, frame: HostFrame) -> Result<(), SubmitError> {
        self.relay.submit(frame)
    }

    /// Run one loop iteration.
    pub fn poll_once(&mut self) -> LoopReport {
        let relay = self.relay.step(&mut *self.can, &mut *self.usb);
        let heartbeat = self.heartbeat.poll(self.clock.now());
        LoopReport { relay, heartbeat }
    }

    /// Run until reset.
    pub fn run(&mut self) -> ! {
        #[cfg(feature = "defmt")]
        defmt::info!("Gateway running with {} buffers", N);
        loop {
            self.poll_once();
        }
    }

    pub fn relay(&self) -> &FrameRelay<N> {
        &self.relay
    }

    pub fn heartbeat(&self) -> &Heartbeat<A, B> {
        &self.heartbeat
    }

    /// Tear down, returning the relay state and the indicator pins.
    pub fn into_parts(self) -> (FrameRelay<N>, Heartbeat<A, B>) {
        (self.relay, self.heartbeat)
    }
}
