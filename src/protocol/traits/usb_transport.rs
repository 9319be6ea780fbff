//! USB bulk-IN endpoint towards the host, seen as a readiness flag plus a
//! non-blocking write.

/// Contract to push host records over the USB bulk endpoint.
pub trait UsbTransport {
    type Error: core::fmt::Debug;
    /// `true` when the endpoint can take a new record. This is the only
    /// backpressure signal between the relay and the USB stack.
    fn is_ready(&mut self) -> bool;
    /// Hand `bytes` to the endpoint. An error leaves the record with the relay.
    fn transmit(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;
}
