//! Descriptor exchanged with the CAN transceiver: identifier, remote flag,
//! length and payload of one classic CAN frame.
use embedded_can::{Frame, Id};

use crate::protocol::host_frame::CAN_MAX_DLEN;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Classic CAN frame as handed to, or read from, the transceiver.
pub struct BusFrame {
    /// Standard (11-bit) or extended (29-bit) identifier.
    pub id: Id,
    /// Remote transmission request.
    pub remote: bool,
    /// Length code as reported by the controller. Receivers may report values
    /// above eight; consumers clip before trusting it.
    pub dlc: u8,
    /// Payload buffer; classic CAN frames always provide eight bytes.
    pub data: [u8; CAN_MAX_DLEN],
}

impl BusFrame {
    /// Length clipped to the classic CAN maximum.
    #[inline]
    pub fn len(&self) -> usize {
        (self.dlc as usize).min(CAN_MAX_DLEN)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy any `embedded_can` frame (typically a HAL receive frame).
    pub fn from_frame<F: Frame>(frame: &F) -> Self {
        let mut data = [0u8; CAN_MAX_DLEN];
        let payload = frame.data();
        let copy_len = payload.len().min(CAN_MAX_DLEN);
        data[..copy_len].copy_from_slice(&payload[..copy_len]);

        Self {
            id: frame.id(),
            remote: frame.is_remote_frame(),
            dlc: frame.dlc().min(u8::MAX as usize) as u8,
            data,
        }
    }

    /// Build a HAL frame for transmission. `None` when the HAL refuses it.
    pub fn to_frame<F: Frame>(&self) -> Option<F> {
        if self.remote {
            F::new_remote(self.id, self.len())
        } else {
            F::new(self.id, &self.data[..self.len()])
        }
    }
}

impl Frame for BusFrame {
    fn new(id: impl Into<Id>, data: &[u8]) -> Option<Self> {
        if data.len() > CAN_MAX_DLEN {
            return None;
        }
        let mut buffer = [0u8; CAN_MAX_DLEN];
        buffer[..data.len()].copy_from_slice(data);
        Some(Self {
            id: id.into(),
            remote: false,
            dlc: data.len() as u8,
            data: buffer,
        })
    }

    fn new_remote(id: impl Into<Id>, dlc: usize) -> Option<Self> {
        if dlc > CAN_MAX_DLEN {
            return None;
        }
        Some(Self {
            id: id.into(),
            remote: true,
            dlc: dlc as u8,
            data: [0; CAN_MAX_DLEN],
        })
    }

    fn is_extended(&self) -> bool {
        matches!(self.id, Id::Extended(_))
    }

    fn is_remote_frame(&self) -> bool {
        self.remote
    }

    fn id(&self) -> Id {
        self.id
    }

    fn dlc(&self) -> usize {
        self.dlc as usize
    }

    fn data(&self) -> &[u8] {
        if self.remote {
            &[]
        } else {
            &self.data[..self.len()]
        }
    }
}
