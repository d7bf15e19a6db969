//! Rate-limited analog controls: [`Fader`] and [`Submaster`].
//!
//! The analog half of a fader runs at most once per
//! [`FADER_UPDATE_INTERVAL_MS`]. Each pass reduces the reading to 8 bits,
//! runs it through a [`DeadbandFilter`] and sends the normalized position
//! only when the filtered value moved. The fire/stop buttons are polled on
//! every update regardless of the timer.

use embedded_hal::digital::InputPin;
use eos_proto::{Address, CapacityError, MessageBuilder, OscArg, OscMessage};

use crate::button::EdgeButton;
use crate::config::{FADER_FULL_SCALE, FADER_THRESHOLD, FADER_UPDATE_INTERVAL_MS};
use crate::control::Control;
use crate::gateway::MessageSink;
use crate::input::AnalogInput;

/// Symmetric hysteresis over 8-bit readings.
///
/// The filtered value trails the raw reading by [`FADER_THRESHOLD`]: it only
/// moves once the reading leaves the band around it, and then follows the
/// band edge. The first reading is always accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeadbandFilter {
    value: Option<i16>,
}

impl DeadbandFilter {
    #[must_use]
    pub const fn new() -> Self {
        Self { value: None }
    }

    /// Last accepted value, `None` before the first reading.
    #[must_use]
    pub const fn value(&self) -> Option<i16> {
        self.value
    }

    /// Feed one reading; returns the new filtered value if it changed.
    pub fn feed(&mut self, raw: i16) -> Option<i16> {
        let next = match self.value {
            None => raw.clamp(FADER_THRESHOLD, FADER_FULL_SCALE - FADER_THRESHOLD),
            Some(current) => {
                let delta = raw - current;
                if delta >= FADER_THRESHOLD {
                    raw - FADER_THRESHOLD
                } else if delta <= -FADER_THRESHOLD {
                    raw + FADER_THRESHOLD
                } else {
                    current
                }
            }
        };
        if self.value == Some(next) {
            return None;
        }
        self.value = Some(next);
        Some(next)
    }
}

/// Map a filtered value onto `0.0..=1.0`.
#[must_use]
pub fn normalize(filtered: i16) -> f32 {
    let span = f32::from(FADER_FULL_SCALE - 2 * FADER_THRESHOLD);
    (f32::from(filtered - FADER_THRESHOLD) / span).clamp(0.0, 1.0)
}

/// Timer, filter and input of one analog control.
pub struct AnalogChannel<A> {
    input: A,
    filter: DeadbandFilter,
    last_sample_ms: u64,
}

impl<A: AnalogInput> AnalogChannel<A> {
    /// Start the sample interval at `now_ms`.
    pub fn new(input: A, now_ms: u64) -> Self {
        Self {
            input,
            filter: DeadbandFilter::new(),
            last_sample_ms: now_ms,
        }
    }

    /// Run one filter pass if the interval elapsed.
    ///
    /// Returns the normalized position when the filtered value changed.
    pub fn poll(&mut self, now_ms: u64) -> Option<f32> {
        if now_ms < self.last_sample_ms.saturating_add(FADER_UPDATE_INTERVAL_MS) {
            return None;
        }
        self.last_sample_ms = now_ms;

        let Some(raw) = self.input.read_8bit() else {
            warn!("analog read failed");
            return None;
        };
        self.filter.feed(raw).map(normalize)
    }

    pub fn filter(&self) -> &DeadbandFilter {
        &self.filter
    }

    pub fn into_input(self) -> A {
        self.input
    }
}

fn send_position<S: MessageSink + ?Sized>(sink: &mut S, address: &Address, position: f32) {
    sink.send(&OscMessage {
        address: address.clone(),
        arg: OscArg::Float(position),
    });
}

fn fader_address(bank: u8, number: u8) -> MessageBuilder {
    MessageBuilder::new("/eos/fader").number(bank).number(number)
}

fn suffixed(builder: &MessageBuilder, suffix: &str) -> Result<Address, CapacityError> {
    builder.clone().segment(suffix).build().map(|msg| msg.address)
}

/// A fader on a console fader bank, sent as `/eos/fader/<bank>/<number>`.
///
/// Optional fire and stop buttons report edges at `.../fire` and `.../stop`.
pub struct Fader<P, A> {
    channel: AnalogChannel<A>,
    bank: u8,
    number: u8,
    address: Address,
    fire: Option<EdgeButton<P>>,
    stop: Option<EdgeButton<P>>,
}

impl<P: InputPin, A: AnalogInput> Fader<P, A> {
    /// Fader `number` of `bank`, sampling `analog` from `now_ms` on, with optional fire and stop pins.
    ///
    /// Fails with [`CapacityError`] only if an address does not fit, which no
    /// `u8` bank and number can cause.
    pub fn new(
        analog: A,
        fire: Option<P>,
        stop: Option<P>,
        number: u8,
        bank: u8,
        now_ms: u64,
    ) -> Result<Self, CapacityError> {
        let base = fader_address(bank, number);
        let fire = match fire {
            Some(pin) => Some(EdgeButton::with_address(pin, suffixed(&base, "fire")?)),
            None => None,
        };
        let stop = match stop {
            Some(pin) => Some(EdgeButton::with_address(pin, suffixed(&base, "stop")?)),
            None => None,
        };
        Ok(Self {
            channel: AnalogChannel::new(analog, now_ms),
            bank,
            number,
            address: base.build()?.address,
            fire,
            stop,
        })
    }

    pub fn address(&self) -> &str {
        self.address.as_str()
    }

    pub fn bank(&self) -> u8 {
        self.bank
    }

    pub fn set_bank(&mut self, bank: u8) -> Result<(), CapacityError> {
        self.rebind(bank, self.number)
    }

    pub fn number(&self) -> u8 {
        self.number
    }

    pub fn set_number(&mut self, number: u8) -> Result<(), CapacityError> {
        self.rebind(self.bank, number)
    }

    fn rebind(&mut self, bank: u8, number: u8) -> Result<(), CapacityError> {
        let base = fader_address(bank, number);
        if let Some(fire) = &mut self.fire {
            fire.set_address(suffixed(&base, "fire")?);
        }
        if let Some(stop) = &mut self.stop {
            stop.set_address(suffixed(&base, "stop")?);
        }
        self.address = base.build()?.address;
        self.bank = bank;
        self.number = number;
        Ok(())
    }
}

impl<P: InputPin, A: AnalogInput> Control for Fader<P, A> {
    fn update<S: MessageSink + ?Sized>(&mut self, sink: &mut S, now_ms: u64) {
        if let Some(position) = self.channel.poll(now_ms) {
            send_position(sink, &self.address, position);
        }
        if let Some(fire) = &mut self.fire {
            fire.poll(sink);
        }
        if let Some(stop) = &mut self.stop {
            stop.poll(sink);
        }
    }
}

/// A submaster fader, sent as `/eos/sub/<number>` with an optional bump
/// button at `/eos/sub/<number>/fire`.
pub struct Submaster<P, A> {
    channel: AnalogChannel<A>,
    number: u8,
    address: Address,
    fire: Option<EdgeButton<P>>,
}

impl<P: InputPin, A: AnalogInput> Submaster<P, A> {
    /// Submaster `number` sampling `analog` from `now_ms` on, with an optional bump pin.
    ///
    /// Fails with [`CapacityError`] only if an address does not fit.
    pub fn new(
        analog: A,
        fire: Option<P>,
        number: u8,
        now_ms: u64,
    ) -> Result<Self, CapacityError> {
        let base = MessageBuilder::new("/eos/sub").number(number);
        let fire = match fire {
            Some(pin) => Some(EdgeButton::with_address(pin, suffixed(&base, "fire")?)),
            None => None,
        };
        Ok(Self {
            channel: AnalogChannel::new(analog, now_ms),
            number,
            address: base.build()?.address,
            fire,
        })
    }

    pub fn address(&self) -> &str {
        self.address.as_str()
    }

    pub fn number(&self) -> u8 {
        self.number
    }
}

impl<P: InputPin, A: AnalogInput> Control for Submaster<P, A> {
    fn update<S: MessageSink + ?Sized>(&mut self, sink: &mut S, now_ms: u64) {
        if let Some(position) = self.channel.poll(now_ms) {
            send_position(sink, &self.address, position);
        }
        if let Some(fire) = &mut self.fire {
            fire.poll(sink);
        }
    }
}
