//! Platform-agnostic control surface logic for the Eos bridge.
//!
//! This crate turns sampled pin levels and analog readings into console
//! messages and hands them to a transport. It has no platform dependencies:
//! pins are [`embedded_hal::digital::InputPin`], analog inputs implement
//! [`AnalogInput`] and transports implement [`Link`].
//!
//! # Overview
//!
//! - [`gateway`]: transport selection and the [`MessageSink`] every control sends to
//! - [`button`]: edge-reporting buttons ([`Key`], [`Macro`], [`EdgeButton`])
//! - [`encoder`]: quadrature controls ([`Encoder`], [`Wheel`])
//! - [`fader`]: rate-limited analog controls ([`Fader`], [`Submaster`])
//! - [`osc_button`]: a button with a fixed payload ([`OscButton`])
//! - [`modifier`]: the shared shift button ([`ShiftButton`])
//! - [`commands`]: one-shot console commands (ping, subscribe, command line)
//! - [`config`]: tuning constants
//!
//! # Poll loop
//!
//! The host calls [`Control::update`] on every control once per loop
//! iteration with a millisecond timestamp. Controls never block and never
//! return errors; a failed read or send only means no message this cycle.
//!
//! ```
//! use eos_core::{Endpoint, Gateway, Link, TransportConfig, TransportError};
//!
//! struct Discard;
//!
//! impl Link for Discard {
//!     fn config(&self) -> TransportConfig {
//!         TransportConfig::FramedSerial
//!     }
//!
//!     fn transmit(&mut self, _packet: &[u8], _to: Option<Endpoint>) -> Result<(), TransportError> {
//!         Ok(())
//!     }
//! }
//!
//! let mut gateway = Gateway::new(Discard);
//! eos_core::commands::ping(&mut gateway);
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (UDP socket link, host testing)
//! - **`defmt`**: Log through defmt (for embedded targets)
//! - **`log`**: Log through the `log` facade
//!
//! # No-std Support
//!
//! This crate is `#![no_std]` by default and uses no heap allocations.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

#[macro_use]
mod fmt;

pub mod button;
pub mod commands;
pub mod config;
pub mod control;
pub mod encoder;
pub mod fader;
pub mod gateway;
pub mod input;
pub mod modifier;
pub mod osc_button;

#[cfg(test)]
mod mock;

pub use button::{EdgeButton, Key, Macro};
pub use config::{ButtonMode, Direction};
pub use control::Control;
pub use encoder::{Encoder, QuadratureDecoder, Wheel};
pub use fader::{DeadbandFilter, Fader, Submaster};
pub use gateway::{
    Endpoint, Gateway, GatewayError, Link, MessageSink, NetworkLink, PacketSocket, SerialLink,
    TransportConfig, TransportError,
};
pub use input::{AnalogInput, Edge, EdgeDetector, Level};
pub use modifier::{Modifier, ShiftButton};
pub use osc_button::OscButton;

pub use eos_proto::{CapacityError, OscArg, OscMessage};
