//! Protocol surface of the gateway: the gs_usb host record exchanged with
//! the USB host, the bus descriptor exchanged with the CAN transceiver,
//! translation between the two, and the collaborator traits.
pub mod bus_frame;
pub mod host_frame;
pub mod traits;
pub mod translate;

/// Number of buffers in the frame pool of the reference board.
pub const FRAME_POOL_SIZE: usize = 32;

/// Timeout handed to the transceiver for each transmit attempt (ms).
///
/// Bounds how long one loop iteration may wait on a busy mailbox before the
/// frame is put back at the head of the host → bus queue.
pub const CAN_SEND_TIMEOUT_MS: u32 = 10;

/// Timeout handed to the transceiver when reading a pending frame (ms).
///
/// Reception is only attempted after the transceiver reported a pending
/// frame, so the read never waits.
pub const CAN_RECEIVE_TIMEOUT_MS: u32 = 0;

/// Liveness indicator toggle period (ms).
pub const HEARTBEAT_PERIOD_MS: u64 = 500;

/// Uptime at which the liveness indicators toggle for the first time (ms).
pub const HEARTBEAT_FIRST_DEADLINE_MS: u64 = 100;
