//! Edge-reporting buttons: the generic [`EdgeButton`], [`Key`] and [`Macro`].

use embedded_hal::digital::InputPin;
use eos_proto::{bounded, Address, CapacityError, MessageBuilder, OscArg, OscMessage};

use crate::control::Control;
use crate::gateway::MessageSink;
use crate::input::{is_active_low, Edge, EdgeDetector};

/// A digital input that sends one message per level change.
///
/// The argument is the edge tag: `0` when the line rises, `1` when it falls.
pub struct EdgeButton<P> {
    pin: P,
    detector: EdgeDetector,
    address: Address,
}

impl<P: InputPin> EdgeButton<P> {
    /// Report edges of `pin` at `address`, starting from the pin's current level.
    pub fn new(pin: P, address: &str) -> Result<Self, CapacityError> {
        bounded(address).map(|address| Self::with_address(pin, address))
    }

    pub(crate) fn with_address(mut pin: P, address: Address) -> Self {
        let detector = EdgeDetector::from_pin(&mut pin);
        Self {
            pin,
            detector,
            address,
        }
    }

    /// Address the edges are sent to.
    pub fn address(&self) -> &str {
        self.address.as_str()
    }

    pub(crate) fn set_address(&mut self, address: Address) {
        self.address = address;
    }

    /// Live read of the (active-low) pin, without touching edge state.
    pub(crate) fn is_held(&mut self) -> bool {
        is_active_low(&mut self.pin)
    }

    /// Sample the pin and send a message if its level changed.
    pub fn poll<S: MessageSink + ?Sized>(&mut self, sink: &mut S) -> Option<Edge> {
        let edge = self.detector.poll(&mut self.pin)?;
        sink.send(&OscMessage {
            address: self.address.clone(),
            arg: OscArg::Int(edge.tag()),
        });
        Some(edge)
    }

    /// Decompose into the pin.
    pub fn into_pin(self) -> P {
        self.pin
    }
}

impl<P: InputPin> Control for EdgeButton<P> {
    fn update<S: MessageSink + ?Sized>(&mut self, sink: &mut S, _now_ms: u64) {
        self.poll(sink);
    }
}

/// A console key, sent as `/eos/key/<name>`.
pub struct Key<P> {
    button: EdgeButton<P>,
}

impl<P: InputPin> Key<P> {
    /// Report edges of `pin` as key `name`; fails if `/eos/key/<name>` does not fit.
    pub fn new(pin: P, name: &str) -> Result<Self, CapacityError> {
        let msg = MessageBuilder::new("/eos/key").segment(name).build()?;
        Ok(Self {
            button: EdgeButton::with_address(pin, msg.address),
        })
    }

    pub fn address(&self) -> &str {
        self.button.address()
    }
}

impl<P: InputPin> Control for Key<P> {
    fn update<S: MessageSink + ?Sized>(&mut self, sink: &mut S, _now_ms: u64) {
        self.button.poll(sink);
    }
}

/// Fires a macro, sent as `/eos/macro/<number>/fire`.
pub struct Macro<P> {
    button: EdgeButton<P>,
}

impl<P: InputPin> Macro<P> {
    /// Report edges of `pin` as macro `number`.
    ///
    /// The address of any `u16` fits, so this never fails in practice.
    pub fn new(pin: P, number: u16) -> Result<Self, CapacityError> {
        let msg = MessageBuilder::new("/eos/macro")
            .number(number)
            .segment("fire")
            .build()?;
        Ok(Self {
            button: EdgeButton::with_address(pin, msg.address),
        })
    }

    pub fn address(&self) -> &str {
        self.button.address()
    }
}

impl<P: InputPin> Control for Macro<P> {
    fn update<S: MessageSink + ?Sized>(&mut self, sink: &mut S, _now_ms: u64) {
        self.button.poll(sink);
    }
}
