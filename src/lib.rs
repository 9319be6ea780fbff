//! `gs-relay` library: the frame-relay core of a USB-to-CAN gateway in a
//! `no_std` environment. Frames travel as gs_usb host records between a CAN
//! transceiver and a USB bulk transport through a fixed pool of buffers and
//! two bounded queues, driven by a single cooperative polling loop.
#![no_std]
//==================================================================================
/// Domain errors (record decoding, host submission, bus translation).
pub mod error;
/// Fixed-capacity building blocks: buffer pool and bounded token queues.
pub mod infra;
/// Wire records, bus descriptors, their translation, and collaborator traits.
pub mod protocol;
/// Relay scheduler moving buffers between the bus and the host.
pub mod relay;
/// Liveness indicators toggled on a fixed period.
pub mod heartbeat;
/// One gateway loop: relay steps plus the liveness heartbeat.
pub mod gateway;
//==================================================================================
