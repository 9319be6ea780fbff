//! gs_usb host frame: the fixed 20-byte record carried verbatim over the
//! USB bulk endpoints, in both directions.
//!
//! ```text
//! offset  size  field
//!      0     4  echo_id   (0xFFFF_FFFF = received from the bus)
//!      4     4  can_id    (bit 31 EFF, bit 30 RTR, bit 29 ERR, low bits address)
//!      8     1  can_dlc
//!      9     1  channel
//!     10     1  flags
//!     11     1  reserved
//!     12     8  data
//! ```
//! Multi-byte fields are little-endian.
use crate::error::DecodeError;

//==================================================================================Constants
/// Size of one host record on the wire.
pub const HOST_FRAME_SIZE: usize = 20;
/// Extended (29-bit) address flag in `can_id`.
pub const CAN_EFF_FLAG: u32 = 0x8000_0000;
/// Remote transmission request flag in `can_id`.
pub const CAN_RTR_FLAG: u32 = 0x4000_0000;
/// Error frame flag in `can_id`. Never produced by this gateway.
pub const CAN_ERR_FLAG: u32 = 0x2000_0000;
/// Mask for a 29-bit extended address.
pub const CAN_EFF_MASK: u32 = 0x1FFF_FFFF;
/// Mask for an 11-bit standard address.
pub const CAN_SFF_MASK: u32 = 0x0000_07FF;
/// `echo_id` of a frame that originates on the bus.
pub const RX_ECHO_ID: u32 = 0xFFFF_FFFF;
/// Largest payload of a classic CAN frame.
pub const CAN_MAX_DLEN: usize = 8;

//==================================================================================HostFrame
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// One CAN frame as the host driver sees it.
pub struct HostFrame {
    /// Host-chosen tag echoed back after transmission, or [`RX_ECHO_ID`].
    pub echo_id: u32,
    /// Address plus the EFF/RTR flag bits.
    pub can_id: u32,
    /// Declared data length. Only trusted after clipping with [`HostFrame::len`].
    pub can_dlc: u8,
    /// Bus index; always 0 on a single-channel gateway.
    pub channel: u8,
    pub flags: u8,
    pub reserved: u8,
    /// Payload; bytes past the data length carry no meaning.
    pub data: [u8; CAN_MAX_DLEN],
}

impl Default for HostFrame {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl HostFrame {
    /// All-zero record, used to fill the pool at start-up.
    pub const fn zeroed() -> Self {
        Self {
            echo_id: 0,
            can_id: 0,
            can_dlc: 0,
            channel: 0,
            flags: 0,
            reserved: 0,
            data: [0; CAN_MAX_DLEN],
        }
    }

    #[inline]
    pub fn is_extended(&self) -> bool {
        self.can_id & CAN_EFF_FLAG != 0
    }

    #[inline]
    pub fn is_remote(&self) -> bool {
        self.can_id & CAN_RTR_FLAG != 0
    }

    /// `true` when the record confirms a host submission rather than
    /// carrying bus traffic.
    #[inline]
    pub fn is_echo(&self) -> bool {
        self.echo_id != RX_ECHO_ID
    }

    /// Data length clipped to the classic CAN maximum.
    #[inline]
    pub fn len(&self) -> usize {
        (self.can_dlc as usize).min(CAN_MAX_DLEN)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Meaningful payload bytes.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.data[..self.len()]
    }

    /// Serialize into the wire layout.
    pub fn to_bytes(&self) -> [u8; HOST_FRAME_SIZE] {
        let mut raw = [0u8; HOST_FRAME_SIZE];
        raw[0..4].copy_from_slice(&self.echo_id.to_le_bytes());
        raw[4..8].copy_from_slice(&self.can_id.to_le_bytes());
        raw[8] = self.can_dlc;
        raw[9] = self.channel;
        raw[10] = self.flags;
        raw[11] = self.reserved;
        raw[12..20].copy_from_slice(&self.data);
        raw
    }

    /// Parse a record received from the host.
    ///
    /// Trailing bytes beyond [`HOST_FRAME_SIZE`] are ignored; `can_dlc` is
    /// kept as sent and clipped only when the frame goes onto the bus.
    pub fn from_bytes(raw: &[u8]) -> Result<Self, DecodeError> {
        if raw.len() < HOST_FRAME_SIZE {
            return Err(DecodeError::TooShort {
                got: raw.len(),
                need: HOST_FRAME_SIZE,
            });
        }

        let mut data = [0u8; CAN_MAX_DLEN];
        data.copy_from_slice(&raw[12..20]);

        Ok(Self {
            echo_id: read_u32_le(&raw[0..4]),
            can_id: read_u32_le(&raw[4..8]),
            can_dlc: raw[8],
            channel: raw[9],
            flags: raw[10],
            reserved: raw[11],
            data,
        })
    }
}

#[inline]
fn read_u32_le(bytes: &[u8]) -> u32 {
    let mut word = [0u8; 4];
    word.copy_from_slice(bytes);
    u32::from_le_bytes(word)
}
