//! Translation between gs_usb host records and bus descriptors.
//!
//! Host → bus: the EFF flag selects a 29-bit or 11-bit identifier (masked),
//! the RTR flag marks a remote request, and at most eight bytes are copied.
//!
//! Bus → host: the record is overwritten completely so a reused pool buffer
//! carries nothing from its previous frame.
use embedded_can::{ExtendedId, Id, StandardId};

use crate::protocol::bus_frame::BusFrame;
use crate::protocol::host_frame::{
    HostFrame, CAN_EFF_FLAG, CAN_EFF_MASK, CAN_MAX_DLEN, CAN_RTR_FLAG, CAN_SFF_MASK, RX_ECHO_ID,
};

/// Channel index stamped on every received record.
pub const BUS_CHANNEL: u8 = 0;

/// Build the transmit descriptor for a host submission.
///
/// Every record translates: the identifier is masked to its address space
/// before the descriptor is built.
pub fn to_bus_frame(record: &HostFrame) -> BusFrame {
    let raw = record.can_id;
    // Masked values are always in range.
    let id = if raw & CAN_EFF_FLAG != 0 {
        Id::Extended(ExtendedId::new(raw & CAN_EFF_MASK).unwrap_or(ExtendedId::ZERO))
    } else {
        Id::Standard(StandardId::new((raw & CAN_SFF_MASK) as u16).unwrap_or(StandardId::ZERO))
    };

    let len = record.len();
    let mut data = [0u8; CAN_MAX_DLEN];
    data[..len].copy_from_slice(&record.data[..len]);

    BusFrame {
        id,
        remote: raw & CAN_RTR_FLAG != 0,
        dlc: len as u8,
        data,
    }
}

/// Overwrite `record` with a frame received from the bus.
pub fn write_received(record: &mut HostFrame, frame: &BusFrame) {
    let len = frame.len();

    record.echo_id = RX_ECHO_ID;
    record.can_dlc = len as u8;
    record.channel = BUS_CHANNEL;
    record.flags = 0;
    record.reserved = 0;

    record.can_id = match frame.id {
        Id::Standard(id) => id.as_raw() as u32,
        Id::Extended(id) => id.as_raw() | CAN_EFF_FLAG,
    };
    if frame.remote {
        record.can_id |= CAN_RTR_FLAG;
    }

    record.data = [0; CAN_MAX_DLEN];
    record.data[..len].copy_from_slice(&frame.data[..len]);
}

/// Convenience wrapper returning a fresh record.
pub fn from_bus_frame(frame: &BusFrame) -> HostFrame {
    let mut record = HostFrame::zeroed();
    write_received(&mut record, frame);
    record
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
