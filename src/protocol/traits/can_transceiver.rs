//! Minimal polled abstraction over a CAN controller and its transceiver.
use crate::protocol::bus_frame::BusFrame;

/// Contract to send and receive CAN frames by polling.
///
/// Every call returns within the supplied timeout; the relay loop relies on
/// that bound to stay responsive.
pub trait CanTransceiver {
    type Error: core::fmt::Debug;
    /// Bring the controller onto the bus. Called once before the first step;
    /// controllers configured by the HAL beforehand keep the default.
    fn init(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
    /// Queue `frame` for transmission, waiting at most `timeout_ms` for a free
    /// mailbox. An error means the frame was not accepted and will be retried.
    fn send(&mut self, frame: &BusFrame, timeout_ms: u32) -> Result<(), Self::Error>;
    /// `true` while the controller holds at least one received frame.
    fn is_rx_pending(&mut self) -> bool;
    /// Read the next received frame, waiting at most `timeout_ms`.
    fn receive(&mut self, timeout_ms: u32) -> Option<BusFrame>;
}
