//! Quadrature motion controls: [`Encoder`] (by parameter name) and [`Wheel`] (by index).
//!
//! # Motion
//!
//! Only a falling edge on pin A counts. Pin B decides the sign at that moment
//! (high: `-1`, low: `+1`), [`Direction::Reverse`] negates it. Rising edges on
//! A are ignored, so at most one unit of motion is produced per poll.
//!
//! # Modifiers
//!
//! While the shift modifier or a fine-mode button is held, an intensity
//! control multiplies its motion by [`INTENSITY_ACCEL`]; any other control
//! appends `/fine` to its address instead. [`WHEEL_ACCEL`] applies to every
//! tick afterwards.

use embedded_hal::digital::InputPin;
use eos_proto::{bounded, Address, CapacityError, MessageBuilder, OscMessage};

use crate::button::EdgeButton;
use crate::config::{
    ButtonMode, Direction, INTENSITY_ACCEL, INTENSITY_PARAMETERS, INTENSITY_WHEEL_INDEX,
    WHEEL_ACCEL,
};
use crate::control::Control;
use crate::gateway::MessageSink;
use crate::input::{is_active_low, sample, Level};
use crate::modifier::Modifier;

/// Falling-edge quadrature decoder for one A/B pin pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QuadratureDecoder {
    last_a: Level,
    direction: Direction,
}

impl QuadratureDecoder {
    #[must_use]
    pub const fn new(direction: Direction) -> Self {
        Self {
            last_a: Level::Low,
            direction,
        }
    }

    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Feed one sample of pin A; `read_b` is only consulted on a falling edge.
    ///
    /// Returns the signed motion for this poll (`-1`, `0` or `1`).
    pub fn feed(&mut self, a: Level, read_b: impl FnOnce() -> Option<Level>) -> i32 {
        let falling = self.last_a == Level::High && a == Level::Low;
        self.last_a = a;
        if !falling {
            return 0;
        }
        let motion = match read_b() {
            Some(Level::High) => -1,
            Some(Level::Low) => 1,
            None => return 0,
        };
        match self.direction {
            Direction::Forward => motion,
            Direction::Reverse => -motion,
        }
    }

    /// Sample the pin pair and return the motion for this poll.
    pub fn poll<P: InputPin>(&mut self, pin_a: &mut P, pin_b: &mut P) -> i32 {
        match sample(pin_a) {
            Some(a) => self.feed(a, || sample(pin_b)),
            None => 0,
        }
    }
}

/// Result of applying the shift/fine modifiers to one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Scaled {
    motion: i32,
    fine: bool,
}

fn apply_modifiers(motion: i32, modified: bool, is_intensity: bool) -> Scaled {
    let (motion, fine) = match (modified, is_intensity) {
        (true, true) => (motion * INTENSITY_ACCEL, false),
        (true, false) => (motion, true),
        (false, _) => (motion, false),
    };
    Scaled {
        motion: motion * WHEEL_ACCEL,
        fine,
    }
}

/// Optional push button of an encoder.
struct EncoderButton<P> {
    mode: ButtonMode,
    button: EdgeButton<P>,
}

/// Encoder bound to a console parameter by name.
///
/// Sends `/eos/wheel[/fine]/<parameter>` with the signed motion. An optional
/// button either homes the parameter (`/eos/param/<parameter>/home` edges) or
/// acts as a fine modifier.
pub struct Encoder<'a, P> {
    pin_a: P,
    pin_b: P,
    decoder: QuadratureDecoder,
    parameter: Address,
    button: Option<EncoderButton<P>>,
    shift: Option<&'a dyn Modifier>,
}

impl<'a, P: InputPin> Encoder<'a, P> {
    /// Bind the A/B pin pair to `parameter`.
    ///
    /// Fails with [`CapacityError`] if `/eos/wheel/fine/<parameter>` does not
    /// fit an address.
    pub fn new(
        pin_a: P,
        pin_b: P,
        direction: Direction,
        parameter: &str,
    ) -> Result<Self, CapacityError> {
        Ok(Self {
            pin_a,
            pin_b,
            decoder: QuadratureDecoder::new(direction),
            parameter: checked_parameter(parameter)?,
            button: None,
            shift: None,
        })
    }

    /// Attach the encoder's push button.
    pub fn with_button(mut self, pin: P, mode: ButtonMode) -> Result<Self, CapacityError> {
        let address = home_address(&self.parameter)?;
        self.button = Some(EncoderButton {
            mode,
            button: EdgeButton::with_address(pin, address),
        });
        Ok(self)
    }

    /// Install the shared shift modifier.
    pub fn with_shift(mut self, shift: &'a dyn Modifier) -> Self {
        self.shift = Some(shift);
        self
    }

    pub fn parameter(&self) -> &str {
        self.parameter.as_str()
    }

    /// Rebind the encoder (and its home button) to another parameter.
    pub fn set_parameter(&mut self, parameter: &str) -> Result<(), CapacityError> {
        let parameter = checked_parameter(parameter)?;
        if let Some(button) = &mut self.button {
            button.button.set_address(home_address(&parameter)?);
        }
        self.parameter = parameter;
        Ok(())
    }

    pub fn direction(&self) -> Direction {
        self.decoder.direction()
    }

    fn is_intensity(&self) -> bool {
        INTENSITY_PARAMETERS.contains(&self.parameter.as_str())
    }

    fn is_modified(&mut self) -> bool {
        let shifted = self.shift.is_some_and(|shift| shift.is_asserted());
        let fine_held = match &mut self.button {
            Some(EncoderButton {
                mode: ButtonMode::Fine,
                button,
            }) => button.is_held(),
            _ => false,
        };
        shifted || fine_held
    }
}

impl<P: InputPin> Control for Encoder<'_, P> {
    fn update<S: MessageSink + ?Sized>(&mut self, sink: &mut S, _now_ms: u64) {
        let motion = self.decoder.poll(&mut self.pin_a, &mut self.pin_b);
        if motion != 0 {
            let scaled = apply_modifiers(motion, self.is_modified(), self.is_intensity());
            match wheel_message("/eos/wheel", scaled, |b| b.segment(self.parameter.as_str())) {
                Ok(msg) => sink.send(&msg),
                Err(_) => warn!("encoder address overflow"),
            }
        }

        if let Some(EncoderButton {
            mode: ButtonMode::Home,
            button,
        }) = &mut self.button
        {
            button.poll(sink);
        }
    }
}

/// Wheel bound to the console's active wheel by index.
///
/// Sends `/eos/active/wheel[/fine]/<index>`. Its optional button only acts as
/// a fine modifier and never sends on its own.
pub struct Wheel<'a, P> {
    pin_a: P,
    pin_b: P,
    decoder: QuadratureDecoder,
    index: u8,
    fine_button: Option<P>,
    shift: Option<&'a dyn Modifier>,
}

impl<'a, P: InputPin> Wheel<'a, P> {
    /// Bind the A/B pin pair to active wheel `index`.
    pub fn new(pin_a: P, pin_b: P, direction: Direction, index: u8) -> Self {
        Self {
            pin_a,
            pin_b,
            decoder: QuadratureDecoder::new(direction),
            index,
            fine_button: None,
            shift: None,
        }
    }

    /// Attach a fine-mode button.
    pub fn with_fine_button(mut self, pin: P) -> Self {
        self.fine_button = Some(pin);
        self
    }

    /// Install the shared shift modifier.
    pub fn with_shift(mut self, shift: &'a dyn Modifier) -> Self {
        self.shift = Some(shift);
        self
    }

    pub fn index(&self) -> u8 {
        self.index
    }

    pub fn set_index(&mut self, index: u8) {
        self.index = index;
    }

    pub fn direction(&self) -> Direction {
        self.decoder.direction()
    }

    fn is_modified(&mut self) -> bool {
        let shifted = self.shift.is_some_and(|shift| shift.is_asserted());
        let fine_held = self.fine_button.as_mut().is_some_and(is_active_low);
        shifted || fine_held
    }
}

impl<P: InputPin> Control for Wheel<'_, P> {
    fn update<S: MessageSink + ?Sized>(&mut self, sink: &mut S, _now_ms: u64) {
        let motion = self.decoder.poll(&mut self.pin_a, &mut self.pin_b);
        if motion == 0 {
            return;
        }
        let is_intensity = self.index == INTENSITY_WHEEL_INDEX;
        let scaled = apply_modifiers(motion, self.is_modified(), is_intensity);
        match wheel_message("/eos/active/wheel", scaled, |b| b.number(self.index)) {
            Ok(msg) => sink.send(&msg),
            Err(_) => warn!("wheel address overflow"),
        }
    }
}

fn wheel_message(
    root: &str,
    scaled: Scaled,
    target: impl FnOnce(MessageBuilder) -> MessageBuilder,
) -> Result<OscMessage, CapacityError> {
    target(MessageBuilder::new(root).segment_if(scaled.fine, "fine"))
        .int(scaled.motion)
        .build()
}

/// Accept `parameter` only if its longest motion address fits.
fn checked_parameter(parameter: &str) -> Result<Address, CapacityError> {
    MessageBuilder::new("/eos/wheel")
        .segment("fine")
        .segment(parameter)
        .build()?;
    bounded(parameter)
}

fn home_address(parameter: &str) -> Result<Address, CapacityError> {
    MessageBuilder::new("/eos/param")
        .segment(parameter)
        .segment("home")
        .build()
        .map(|msg| msg.address)
}
