//! Test doubles standing in for the CAN transceiver, the USB endpoint, the
//! clock and the indicator pins. Each fake is a cheap handle over shared
//! state so a test can keep a probe while the gateway borrows the fake.
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

use embassy_time::Instant;
use embedded_can::{ExtendedId, Id, StandardId};
use embedded_hal::digital::{ErrorType, OutputPin};
use gs_relay::protocol::{
    bus_frame::BusFrame,
    host_frame::HostFrame,
    traits::{can_transceiver::CanTransceiver, monotonic::Monotonic, usb_transport::UsbTransport},
};

#[derive(Debug)]
pub enum FakeError {
    Busy,
    Stalled,
}

//==================================================================================CAN
#[derive(Default)]
pub struct CanState {
    /// Results of the next send attempts; empty means success.
    pub send_script: VecDeque<bool>,
    /// Descriptors accepted by the bus, in order.
    pub sent: Vec<BusFrame>,
    /// Every send attempt, accepted or not.
    pub attempts: Vec<BusFrame>,
    /// Pending receptions; `None` is a pending flag that yields no frame.
    pub rx: VecDeque<Option<BusFrame>>,
    pub receive_calls: usize,
    pub init_calls: usize,
    /// Makes the next `init` fail.
    pub fail_init: bool,
}

#[derive(Clone, Default)]
pub struct FakeTransceiver(Rc<RefCell<CanState>>);

impl FakeTransceiver {
    pub fn fail_next_sends(&self, count: usize) {
        let mut state = self.0.borrow_mut();
        for _ in 0..count {
            state.send_script.push_back(false);
        }
    }

    pub fn fail_forever(&self) {
        self.fail_next_sends(10_000);
    }

    pub fn succeed_from_now(&self) {
        self.0.borrow_mut().send_script.clear();
    }

    pub fn push_rx(&self, frame: BusFrame) {
        self.0.borrow_mut().rx.push_back(Some(frame));
    }

    pub fn push_spurious_rx(&self) {
        self.0.borrow_mut().rx.push_back(None);
    }

    pub fn fail_next_init(&self) {
        self.0.borrow_mut().fail_init = true;
    }

    pub fn state(&self) -> std::cell::Ref<'_, CanState> {
        self.0.borrow()
    }
}

impl CanTransceiver for FakeTransceiver {
    type Error = FakeError;

    fn init(&mut self) -> Result<(), FakeError> {
        let mut state = self.0.borrow_mut();
        state.init_calls += 1;
        if std::mem::take(&mut state.fail_init) {
            Err(FakeError::Stalled)
        } else {
            Ok(())
        }
    }

    fn send(&mut self, frame: &BusFrame, _timeout_ms: u32) -> Result<(), FakeError> {
        let mut state = self.0.borrow_mut();
        state.attempts.push(*frame);
        if state.send_script.pop_front().unwrap_or(true) {
            state.sent.push(*frame);
            Ok(())
        } else {
            Err(FakeError::Busy)
        }
    }

    fn is_rx_pending(&mut self) -> bool {
        !self.0.borrow().rx.is_empty()
    }

    fn receive(&mut self, _timeout_ms: u32) -> Option<BusFrame> {
        let mut state = self.0.borrow_mut();
        state.receive_calls += 1;
        state.rx.pop_front().flatten()
    }
}

//==================================================================================USB
#[derive(Default)]
pub struct UsbState {
    pub ready: bool,
    /// Results of the next transmissions; empty means success.
    pub transmit_script: VecDeque<bool>,
    /// Records accepted by the endpoint, decoded back.
    pub delivered: Vec<HostFrame>,
    pub transmit_calls: usize,
}

#[derive(Clone, Default)]
pub struct FakeTransport(Rc<RefCell<UsbState>>);

impl FakeTransport {
    pub fn ready() -> Self {
        let transport = Self::default();
        transport.set_ready(true);
        transport
    }

    pub fn set_ready(&self, ready: bool) {
        self.0.borrow_mut().ready = ready;
    }

    pub fn fail_next_transmits(&self, count: usize) {
        let mut state = self.0.borrow_mut();
        for _ in 0..count {
            state.transmit_script.push_back(false);
        }
    }

    pub fn state(&self) -> std::cell::Ref<'_, UsbState> {
        self.0.borrow()
    }
}

impl UsbTransport for FakeTransport {
    type Error = FakeError;

    fn is_ready(&mut self) -> bool {
        self.0.borrow().ready
    }

    fn transmit(&mut self, bytes: &[u8]) -> Result<(), FakeError> {
        let mut state = self.0.borrow_mut();
        state.transmit_calls += 1;
        if !state.transmit_script.pop_front().unwrap_or(true) {
            return Err(FakeError::Stalled);
        }
        let record = HostFrame::from_bytes(bytes).expect("relay must emit full records");
        state.delivered.push(record);
        Ok(())
    }
}

//==================================================================================CLOCK
#[derive(Default)]
pub struct ManualClock {
    now_ms: Cell<u64>,
}

impl ManualClock {
    pub fn advance(&self, millis: u64) {
        self.now_ms.set(self.now_ms.get() + millis);
    }
}

impl Monotonic for ManualClock {
    fn now(&self) -> Instant {
        Instant::from_millis(self.now_ms.get())
    }
}

//==================================================================================PINS
/// Output pin whose level stays observable through a cloned handle.
#[derive(Clone, Default)]
pub struct FakePin(Rc<Cell<bool>>);

impl FakePin {
    pub fn is_high(&self) -> bool {
        self.0.get()
    }
}

impl ErrorType for FakePin {
    type Error = Infallible;
}

impl OutputPin for FakePin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.set(true);
        Ok(())
    }
}

//==================================================================================BUILDERS
/// Host submission with a standard identifier.
pub fn standard_record(echo_id: u32, id: u32, payload: &[u8]) -> HostFrame {
    let mut data = [0u8; 8];
    data[..payload.len()].copy_from_slice(payload);
    HostFrame {
        echo_id,
        can_id: id,
        can_dlc: payload.len() as u8,
        channel: 0,
        flags: 0,
        reserved: 0,
        data,
    }
}

pub fn standard_bus_frame(id: u16, payload: &[u8]) -> BusFrame {
    let mut data = [0u8; 8];
    data[..payload.len()].copy_from_slice(payload);
    BusFrame {
        id: Id::Standard(StandardId::new(id).expect("11-bit id")),
        remote: false,
        dlc: payload.len() as u8,
        data,
    }
}

pub fn extended_bus_frame(id: u32, dlc: u8, data: [u8; 8]) -> BusFrame {
    BusFrame {
        id: Id::Extended(ExtendedId::new(id).expect("29-bit id")),
        remote: false,
        dlc,
        data,
    }
}
