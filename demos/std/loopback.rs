//! # Loopback demo
//!
//! Runs the gateway on the host against an in-memory bus that hears its own
//! transmissions, the way a controller in loopback mode does. Each host
//! submission therefore comes back twice: once as the echo, once as bus
//! traffic.
//!
//! ```bash
//! cargo run --example loopback
//! ```

use std::collections::VecDeque;
use std::convert::Infallible;
use std::time::Instant as StdInstant;

use embassy_time::Instant;
use embedded_hal::digital::{ErrorType, OutputPin};
use gs_relay::{
    gateway::{enable_transceiver, Gateway},
    heartbeat::{Heartbeat, HeartbeatConfig},
    protocol::{
        bus_frame::BusFrame,
        host_frame::{HostFrame, CAN_EFF_FLAG},
        traits::{
            can_transceiver::CanTransceiver, monotonic::Monotonic, usb_transport::UsbTransport,
        },
        FRAME_POOL_SIZE,
    },
    relay::FrameRelay,
};
use static_cell::StaticCell;

// ============================================================================
// Loopback bus
// ============================================================================

#[derive(Default)]
struct LoopbackBus {
    heard: VecDeque<BusFrame>,
}

impl CanTransceiver for LoopbackBus {
    type Error = Infallible;

    fn send(&mut self, frame: &BusFrame, _timeout_ms: u32) -> Result<(), Self::Error> {
        self.heard.push_back(*frame);
        Ok(())
    }

    fn is_rx_pending(&mut self) -> bool {
        !self.heard.is_empty()
    }

    fn receive(&mut self, _timeout_ms: u32) -> Option<BusFrame> {
        self.heard.pop_front()
    }
}

// ============================================================================
// Host endpoint printing every record it receives
// ============================================================================

struct ConsoleHost;

impl UsbTransport for ConsoleHost {
    type Error = Infallible;

    fn is_ready(&mut self) -> bool {
        true
    }

    fn transmit(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        if let Ok(frame) = HostFrame::from_bytes(bytes) {
            let kind = if frame.is_echo() { "echo" } else { "rx  " };
            println!(
                "[host] {kind} id={:#010x} len={} data={:02x?}",
                frame.can_id,
                frame.len(),
                frame.payload()
            );
        }
        Ok(())
    }
}

// ============================================================================
// Clock and indicators
// ============================================================================

struct StdClock(StdInstant);

impl Monotonic for StdClock {
    fn now(&self) -> Instant {
        Instant::from_millis(self.0.elapsed().as_millis() as u64)
    }
}

struct ConsolePin(&'static str);

impl ErrorType for ConsolePin {
    type Error = Infallible;
}

impl OutputPin for ConsolePin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        println!("[pin] {} low", self.0);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        println!("[pin] {} high", self.0);
        Ok(())
    }
}

static BUS: StaticCell<LoopbackBus> = StaticCell::new();
static HOST: StaticCell<ConsoleHost> = StaticCell::new();
static CLOCK: StaticCell<StdClock> = StaticCell::new();

fn main() {
    let bus = BUS.init(LoopbackBus::default());
    let host = HOST.init(ConsoleHost);
    let clock = CLOCK.init(StdClock(StdInstant::now()));

    enable_transceiver(&mut ConsolePin("can_standby"));
    let heartbeat = Heartbeat::new(
        ConsolePin("led_a"),
        ConsolePin("led_b"),
        HeartbeatConfig::default(),
    );

    let mut gateway: Gateway<'_, _, _, _, _, _, FRAME_POOL_SIZE> =
        Gateway::new(FrameRelay::default(), bus, host, &*clock, heartbeat);
    if let Err(err) = gateway.init() {
        println!("[bus] init failed: {err:?}");
        return;
    }

    let submissions = [
        HostFrame {
            echo_id: 0,
            can_id: 0x123,
            can_dlc: 4,
            data: [1, 2, 3, 4, 0, 0, 0, 0],
            ..HostFrame::zeroed()
        },
        HostFrame {
            echo_id: 1,
            can_id: CAN_EFF_FLAG | 0x1ABC_DE01,
            can_dlc: 8,
            data: [8, 7, 6, 5, 4, 3, 2, 1],
            ..HostFrame::zeroed()
        },
    ];
    for frame in submissions {
        if let Err(err) = gateway.submit_from_host(&frame.to_bytes()) {
            println!("[host] submission refused: {err}");
        }
    }

    let started = StdInstant::now();
    while started.elapsed().as_millis() < 1_200 {
        gateway.poll_once();
    }

    let stats = gateway.relay().stats();
    println!(
        "echoed={} received={} delivered={} heartbeat toggles={}",
        stats.echoed,
        stats.received,
        stats.delivered,
        gateway.heartbeat().toggles()
    );
}
