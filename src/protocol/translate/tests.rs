//! Unit tests for host record ↔ bus descriptor translation.
use super::*;

fn record(can_id: u32, can_dlc: u8, data: [u8; 8]) -> HostFrame {
    HostFrame {
        echo_id: 0x55,
        can_id,
        can_dlc,
        channel: 0,
        flags: 0,
        reserved: 0,
        data,
    }
}

//==================================================================================HOST_TO_BUS
#[test]
/// Standard identifiers are masked to 11 bits.
fn test_standard_id_is_masked() {
    let frame = to_bus_frame(&record(0x0000_F923, 2, [1, 2, 0, 0, 0, 0, 0, 0]));
    assert_eq!(frame.id, Id::Standard(StandardId::new(0x123).unwrap()));
    assert!(!frame.remote);
    assert_eq!(frame.dlc, 2);
    assert_eq!(&frame.data[..2], &[1, 2]);
}

#[test]
/// All-ones identifiers land on the top of each address space.
fn test_all_ones_id_translates() {
    let standard = to_bus_frame(&record(!CAN_EFF_FLAG, 0, [0; 8]));
    assert_eq!(standard.id, Id::Standard(StandardId::MAX));
    assert!(standard.remote);

    let extended = to_bus_frame(&record(u32::MAX, 0, [0; 8]));
    assert_eq!(extended.id, Id::Extended(ExtendedId::MAX));
}

#[test]
/// Extended identifiers are masked to 29 bits; the RTR flag maps to a remote request.
fn test_extended_remote_request() {
    let raw = CAN_EFF_FLAG | CAN_RTR_FLAG | 0x1ABC_DE01;
    let frame = to_bus_frame(&record(raw, 0, [0; 8]));
    assert_eq!(frame.id, Id::Extended(ExtendedId::new(0x1ABC_DE01).unwrap()));
    assert!(frame.remote);
    assert_eq!(frame.dlc, 0);
}

#[test]
/// An oversized host length is clipped to eight on the bus.
fn test_host_length_is_clipped() {
    let frame = to_bus_frame(&record(0x10, 12, [8, 7, 6, 5, 4, 3, 2, 1]));
    assert_eq!(frame.dlc, 8);
    assert_eq!(frame.data, [8, 7, 6, 5, 4, 3, 2, 1]);
}

#[test]
/// Bytes past the declared length never reach the bus.
fn test_unused_payload_is_not_copied() {
    let frame = to_bus_frame(&record(0x10, 3, [1, 2, 3, 4, 5, 6, 7, 8]));
    assert_eq!(frame.data, [1, 2, 3, 0, 0, 0, 0, 0]);
}

//==================================================================================BUS_TO_HOST
#[test]
/// A received frame fully overwrites a reused record.
fn test_received_frame_resets_record() {
    let mut stale = record(0x7FF, 8, [0xEE; 8]);
    stale.channel = 3;
    stale.flags = 1;
    stale.reserved = 9;

    let frame = BusFrame {
        id: Id::Standard(StandardId::new(0x42).unwrap()),
        remote: false,
        dlc: 2,
        data: [0xA0, 0xA1, 0, 0, 0, 0, 0, 0],
    };
    write_received(&mut stale, &frame);

    assert_eq!(stale.echo_id, RX_ECHO_ID);
    assert_eq!(stale.can_id, 0x42);
    assert_eq!(stale.can_dlc, 2);
    assert_eq!(stale.channel, BUS_CHANNEL);
    assert_eq!(stale.flags, 0);
    assert_eq!(stale.reserved, 0);
    assert_eq!(stale.data, [0xA0, 0xA1, 0, 0, 0, 0, 0, 0]);
}

#[test]
/// Extended reception with a raw length of ten: clipped to eight, EFF set.
fn test_received_extended_length_clipped() {
    let frame = BusFrame {
        id: Id::Extended(ExtendedId::new(0x1ABC_DE01).unwrap()),
        remote: false,
        dlc: 10,
        data: [1, 2, 3, 4, 5, 6, 7, 8],
    };
    let host = from_bus_frame(&frame);
    assert_eq!(host.can_id, CAN_EFF_FLAG | 0x1ABC_DE01);
    assert_eq!(host.can_dlc, 8);
    assert_eq!(host.data, [1, 2, 3, 4, 5, 6, 7, 8]);
    assert!(!host.is_echo());
}

//==================================================================================ROUND_TRIP
#[test]
/// Extended + RTR record survives record → descriptor → record for every length.
fn test_round_trip_extended_remote() {
    for len in 0..=8u8 {
        let mut data = [0u8; 8];
        for (i, byte) in data.iter_mut().enumerate().take(len as usize) {
            *byte = 0x10 + i as u8;
        }
        let original = record(CAN_EFF_FLAG | CAN_RTR_FLAG | 0x0ABC_1234, len, data);

        let descriptor = to_bus_frame(&original);
        let restored = from_bus_frame(&descriptor);

        assert_eq!(restored.can_id, original.can_id, "len {len}");
        assert_eq!(restored.can_dlc, original.can_dlc, "len {len}");
        assert_eq!(restored.payload(), original.payload(), "len {len}");
        assert!(restored.is_extended() && restored.is_remote());
    }
}
