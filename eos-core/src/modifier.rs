//! Shift modifier shared by every motion control.

use core::cell::RefCell;

use embedded_hal::digital::InputPin;

use crate::input::is_active_low;

/// A read-only "is the modifier held" query.
///
/// Polled live by motion controls on every tick; nothing is latched.
pub trait Modifier {
    fn is_asserted(&self) -> bool;
}

/// Active-low shift button wired to a pulled-up input.
///
/// One instance is shared by reference between all encoders and wheels.
pub struct ShiftButton<P> {
    pin: RefCell<P>,
}

impl<P: InputPin> ShiftButton<P> {
    pub fn new(pin: P) -> Self {
        Self {
            pin: RefCell::new(pin),
        }
    }

    pub fn into_inner(self) -> P {
        self.pin.into_inner()
    }
}

impl<P: InputPin> Modifier for ShiftButton<P> {
    fn is_asserted(&self) -> bool {
        // A re-entrant read while borrowed counts as not held.
        match self.pin.try_borrow_mut() {
            Ok(mut pin) => is_active_low(&mut *pin),
            Err(_) => false,
        }
    }
}
