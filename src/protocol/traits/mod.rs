//! Capability traits for the gateway's collaborators: CAN transceiver, USB
//! transport and monotonic clock. Hardware handles implement them; tests
//! substitute fakes.
pub mod can_transceiver;
pub mod monotonic;
pub mod usb_transport;
