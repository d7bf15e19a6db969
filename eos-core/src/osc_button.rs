//! A button that sends a fixed, arbitrary message.

use embedded_hal::digital::InputPin;
use eos_proto::{bounded, Address, CapacityError, OscArg, OscMessage};

use crate::control::Control;
use crate::gateway::{Endpoint, MessageSink};
use crate::input::{Edge, EdgeDetector};

/// Sends one preset message each time the pulled-up line falls.
///
/// Unlike [`EdgeButton`](crate::button::EdgeButton) the opposite edge is
/// silent, and the payload is fixed at construction. On a network link the
/// message can go to its own [`Endpoint`] instead of the gateway default.
pub struct OscButton<P> {
    pin: P,
    detector: EdgeDetector,
    message: OscMessage,
    destination: Option<Endpoint>,
}

impl<P: InputPin> OscButton<P> {
    /// Send `payload` to `address` on each press of `pin`; fails if `address` exceeds 64 bytes.
    pub fn new(mut pin: P, address: &str, payload: OscArg) -> Result<Self, CapacityError> {
        let address: Address = bounded(address)?;
        let detector = EdgeDetector::from_pin(&mut pin);
        Ok(Self {
            pin,
            detector,
            message: OscMessage {
                address,
                arg: payload,
            },
            destination: None,
        })
    }

    /// Send to `destination` instead of the gateway's default.
    pub fn with_destination(mut self, destination: Endpoint) -> Self {
        self.destination = Some(destination);
        self
    }

    pub fn message(&self) -> &OscMessage {
        &self.message
    }

    pub fn destination(&self) -> Option<Endpoint> {
        self.destination
    }
}

impl<P: InputPin> Control for OscButton<P> {
    fn update<S: MessageSink + ?Sized>(&mut self, sink: &mut S, _now_ms: u64) {
        if self.detector.poll(&mut self.pin) == Some(Edge::Down) {
            sink.send_to(&self.message, self.destination);
        }
    }
}
