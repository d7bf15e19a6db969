//! Input sampling: pin levels, edge detection and the analog input trait.

use embedded_hal::digital::InputPin;
use eos_proto::{EDGE_DOWN, EDGE_UP};

/// Logic level of a digital input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Low,
    High,
}

impl From<bool> for Level {
    #[inline]
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// Direction of a level transition, as reported to the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    /// The line went from low to high.
    Up,
    /// The line went from high to low.
    Down,
}

impl Edge {
    /// Integer argument carried by edge messages.
    #[inline]
    #[must_use]
    pub const fn tag(self) -> i32 {
        match self {
            Edge::Up => EDGE_UP,
            Edge::Down => EDGE_DOWN,
        }
    }
}

/// Sample a pin, treating a read error as "no sample this poll".
#[inline]
pub fn sample<P: InputPin>(pin: &mut P) -> Option<Level> {
    match pin.is_high() {
        Ok(high) => Some(Level::from(high)),
        Err(_) => {
            warn!("pin read failed");
            None
        }
    }
}

/// Sample an active-low modifier pin (shift, fine button).
///
/// A failed read counts as not asserted.
#[inline]
pub fn is_active_low<P: InputPin>(pin: &mut P) -> bool {
    sample(pin) == Some(Level::Low)
}

/// Level-comparison edge detector for one digital input.
///
/// The stored level always reflects the last successful sample, so exactly one
/// edge is reported per level change regardless of how often it is polled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EdgeDetector {
    last: Level,
}

impl EdgeDetector {
    /// Start from a known level.
    #[must_use]
    pub const fn new(initial: Level) -> Self {
        Self { last: initial }
    }

    /// Start from the pin's current level.
    ///
    /// An unreadable pin starts high, the idle level of a pulled-up input.
    pub fn from_pin<P: InputPin>(pin: &mut P) -> Self {
        Self::new(sample(pin).unwrap_or(Level::High))
    }

    /// Last observed level.
    #[inline]
    #[must_use]
    pub const fn level(&self) -> Level {
        self.last
    }

    /// Feed one sample and report the transition away from the stored level.
    #[inline]
    pub fn feed(&mut self, level: Level) -> Option<Edge> {
        if level == self.last {
            return None;
        }
        let edge = match self.last {
            Level::Low => Edge::Up,
            Level::High => Edge::Down,
        };
        self.last = level;
        Some(edge)
    }

    /// Sample `pin` and report a transition, if any.
    #[inline]
    pub fn poll<P: InputPin>(&mut self, pin: &mut P) -> Option<Edge> {
        sample(pin).and_then(|level| self.feed(level))
    }
}

/// An analog input channel (fader wiper).
///
/// Implemented by the platform layer over its ADC driver.
pub trait AnalogInput {
    /// Resolution of raw readings in bits, within `8..=16`.
    fn resolution_bits(&self) -> u8;

    /// Read the current raw value, or `None` if the conversion failed.
    fn read_raw(&mut self) -> Option<u16>;

    /// Read the current value reduced to 8 bits.
    fn read_8bit(&mut self) -> Option<i16> {
        let shift = self.resolution_bits().saturating_sub(8).min(8);
        self.read_raw().map(|raw| (raw >> shift).min(0xFF) as i16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockAnalog, MockPin};

    #[test]
    fn test_edge_tags() {
        assert_eq!(Edge::Up.tag(), 0);
        assert_eq!(Edge::Down.tag(), 1);
    }

    #[test]
    fn test_detector_reports_once_per_change() {
        let mut detector = EdgeDetector::new(Level::High);
        assert_eq!(detector.feed(Level::High), None);
        assert_eq!(detector.feed(Level::Low), Some(Edge::Down));
        assert_eq!(detector.feed(Level::Low), None);
        assert_eq!(detector.feed(Level::Low), None);
        assert_eq!(detector.feed(Level::High), Some(Edge::Up));
        assert_eq!(detector.level(), Level::High);
    }

    #[test]
    fn test_detector_first_edge_reflects_initial_level() {
        let (mut pin, line) = MockPin::new(Level::Low);
        let mut detector = EdgeDetector::from_pin(&mut pin);
        assert_eq!(detector.poll(&mut pin), None);

        line.set(Level::High);
        assert_eq!(detector.poll(&mut pin), Some(Edge::Up));
    }

    #[test]
    fn test_read_error_is_no_sample() {
        let (mut pin, line) = MockPin::new(Level::High);
        let mut detector = EdgeDetector::from_pin(&mut pin);
        line.set(Level::Low);
        line.fail(true);
        assert_eq!(detector.poll(&mut pin), None);
        assert!(!is_active_low(&mut pin));

        line.fail(false);
        assert_eq!(detector.poll(&mut pin), Some(Edge::Down));
    }

    #[test]
    fn test_analog_reduced_to_8bit() {
        let (mut ten_bit, value) = MockAnalog::new(10, 1023);
        assert_eq!(ten_bit.read_8bit(), Some(255));
        value.set(512);
        assert_eq!(ten_bit.read_8bit(), Some(128));

        let (mut twelve_bit, _) = MockAnalog::new(12, 4095);
        assert_eq!(twelve_bit.read_8bit(), Some(255));
    }

    #[test]
    fn test_analog_oversized_resolution_saturates() {
        let (mut wide, value) = MockAnalog::new(24, 0xFFFF);
        assert_eq!(wide.read_8bit(), Some(255));
        value.set(0x0100);
        assert_eq!(wide.read_8bit(), Some(1));
    }
}
