//! Host-side test doubles: pins, analog inputs, and a recording message sink.
extern crate std;

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::digital::{self, ErrorKind, ErrorType, InputPin};
use eos_proto::OscMessage;

use crate::gateway::{Endpoint, MessageSink};
use crate::input::{AnalogInput, Level};

#[derive(Debug)]
pub struct MockPinError;

impl digital::Error for MockPinError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

#[derive(Default)]
struct LineState {
    high: Cell<bool>,
    failing: Cell<bool>,
}

/// Test-side handle driving a [`MockPin`].
#[derive(Clone)]
pub struct Line(Rc<LineState>);

impl Line {
    pub fn set(&self, level: Level) {
        self.0.high.set(level == Level::High);
    }

    pub fn fail(&self, failing: bool) {
        self.0.failing.set(failing);
    }
}

pub struct MockPin(Rc<LineState>);

impl MockPin {
    pub fn new(level: Level) -> (Self, Line) {
        let state = Rc::new(LineState::default());
        state.high.set(level == Level::High);
        (Self(state.clone()), Line(state))
    }
}

impl ErrorType for MockPin {
    type Error = MockPinError;
}

impl InputPin for MockPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        if self.0.failing.get() {
            Err(MockPinError)
        } else {
            Ok(self.0.high.get())
        }
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

pub struct MockAnalog {
    bits: u8,
    value: Rc<Cell<u16>>,
}

impl MockAnalog {
    pub fn new(bits: u8, initial: u16) -> (Self, Rc<Cell<u16>>) {
        let value = Rc::new(Cell::new(initial));
        (
            Self {
                bits,
                value: value.clone(),
            },
            value,
        )
    }
}

impl AnalogInput for MockAnalog {
    fn resolution_bits(&self) -> u8 {
        self.bits
    }

    fn read_raw(&mut self) -> Option<u16> {
        Some(self.value.get())
    }
}

/// Records every message handed to it, with its destination override.
#[derive(Default, Clone)]
pub struct RecordingSink {
    sent: Rc<RefCell<Vec<(OscMessage, Option<Endpoint>)>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<OscMessage> {
        self.sent.borrow().iter().map(|(m, _)| m.clone()).collect()
    }

    pub fn destinations(&self) -> Vec<Option<Endpoint>> {
        self.sent.borrow().iter().map(|(_, d)| *d).collect()
    }

    pub fn len(&self) -> usize {
        self.sent.borrow().len()
    }

    pub fn clear(&self) {
        self.sent.borrow_mut().clear();
    }
}

impl MessageSink for RecordingSink {
    fn send_to(&mut self, message: &OscMessage, destination: Option<Endpoint>) {
        self.sent.borrow_mut().push((message.clone(), destination));
    }
}
