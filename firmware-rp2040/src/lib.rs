//! Eos control surface bridge for RP2040.
//!
//! This crate wires the platform-agnostic controls of [`eos_core`] to the
//! RP2040's GPIO, ADC and USB peripherals.
//!
//! # Overview
//!
//! The firmware runs on a Raspberry Pi Pico (RP2040) and:
//! 1. Polls every control of the [`board::Surface`] once per millisecond
//! 2. Encodes resulting messages as OSC packets, framed with SLIP
//! 3. Streams the frames to the host over a USB CDC-ACM serial port
//!
//! # Architecture
//!
//! The firmware uses the Embassy async runtime with three concurrent tasks:
//!
//! - **USB Task**: Manages the USB device stack
//! - **Control Task**: Polls the surface and queues encoded frames
//! - **Serial Task**: Drains the frame queue into the CDC-ACM endpoint
//!
//! The control task never waits on USB. Frames travel through an Embassy
//! [`Channel`](embassy_sync::channel::Channel); when the host is slow or
//! absent and the queue is full, new frames are dropped.
//!
//! # Modules
//!
//! - [`board`]: pin assignment and the concrete control set ([`Surface`])
//! - [`analog`]: ADC channels as [`eos_core::AnalogInput`] ([`AdcInput`])
//! - [`usb_serial`]: frame queue and CDC-ACM forwarding ([`FrameQueue`])
//!
//! # Features
//!
//! - **`dev-panic`** (default): Use `panic-probe` for development (prints panic info via RTT)
//! - **`prod-panic`**: Use `panic-reset` for production (silent watchdog reset)

#![no_std]

pub mod analog;
pub mod board;
pub mod usb_serial;

pub use analog::AdcInput;
pub use board::{Surface, SurfacePins};
pub use usb_serial::{
    configure_usb_serial, forward_frames, Frame, FrameChannel, FrameQueue, QueueError,
};

/// Gateway type used by the firmware.
pub type SerialGateway = eos_core::Gateway<eos_core::SerialLink<FrameQueue<'static>>>;
