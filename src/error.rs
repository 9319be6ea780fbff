//! Error definitions shared across library modules.
//! Relay steps themselves never fail: transient collaborator failures are
//! retried in place. These types cover the edges where input is refused.
use thiserror_no_std::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Errors raised while decoding a gs_usb host record from raw bytes.
pub enum DecodeError {
    /// Fewer bytes than a full host record.
    #[error("Host frame too short -> got: {got}, need: {need}")]
    TooShort { got: usize, need: usize },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Errors returned when the host hands a record to the relay.
pub enum SubmitError {
    /// Every buffer is in use; the submission was not stored.
    #[error("Frame pool exhausted")]
    PoolExhausted,
    /// The host → bus queue refused the buffer; it went back to the pool.
    #[error("Host to bus queue full")]
    QueueFull,
    /// The raw record could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Buffer ownership violations found by an audit of the relay containers.
pub enum AuditError {
    /// The slot is referenced from more than one container.
    #[error("Slot {slot} owned twice")]
    Duplicate { slot: usize },
    /// The slot is referenced from no container.
    #[error("Slot {slot} not owned")]
    Missing { slot: usize },
}
