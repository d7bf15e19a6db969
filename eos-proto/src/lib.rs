//! Outbound message model and wire codecs for the Eos control bridge.
//!
//! This crate provides everything needed to put a control message on the wire:
//!
//! - **Types**: the message model
//!   - [`OscMessage`] - address plus zero or one argument
//!   - [`OscArg`] - `None`, `Int`, `Float` or `Str`
//!
//! - **Building**: [`MessageBuilder`] composes hierarchical addresses
//!
//! - **Encoding**: [`Encode`] writes OSC 1.0 packets
//!
//! - **Framing**: [`slip`] wraps packets for the serial transport
//!
//! # Protocol Format
//!
//! Messages are plain OSC 1.0 messages. Over a network link each message is
//! one UDP datagram. Over a serial link each message is one SLIP frame
//! (OSC 1.1 stream convention):
//!
//! ```text
//! 0xC0 <escaped OSC packet> 0xC0
//! ```
//!
//! # Example
//!
//! ```
//! use eos_proto::{slip, Encode, MessageBuilder, MAX_MESSAGE_SIZE};
//!
//! let msg = MessageBuilder::new("/eos/key/go").int(1).build().unwrap();
//!
//! let mut packet = [0u8; MAX_MESSAGE_SIZE];
//! let len = msg.encode(&mut packet).unwrap();
//!
//! let mut frame = [0u8; slip::max_frame_len(MAX_MESSAGE_SIZE)];
//! let framed = slip::encode_frame(&packet[..len], &mut frame).unwrap();
//! assert_eq!(frame[0], slip::END);
//! assert_eq!(frame[framed - 1], slip::END);
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting (for embedded logging)
//! - **`embedded-io`**: Enable [`Encode::encode_io`] and [`slip::SlipWriter`]
//!
//! # No-std Support
//!
//! This crate is `#![no_std]` by default and uses no heap allocations.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod builder;
pub mod encode;
pub mod slip;
pub mod types;

pub use builder::MessageBuilder;
pub use encode::{padded_len, Encode, EncodeError, MAX_MESSAGE_SIZE};
pub use types::{
    bounded, Address, CapacityError, OscArg, OscMessage, Text, EDGE_DOWN, EDGE_UP,
    MAX_ADDRESS_LEN, MAX_STRING_LEN, SUBSCRIBE, UNSUBSCRIBE,
};

/// Worst-case size of a SLIP frame carrying any [`OscMessage`].
pub const MAX_FRAME_SIZE: usize = slip::max_frame_len(MAX_MESSAGE_SIZE);
