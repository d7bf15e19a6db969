//! ADC channels as fader inputs.

use core::cell::RefCell;

use embassy_rp::adc::{Adc, Blocking, Channel};
use eos_core::AnalogInput;

/// RP2040 ADC resolution.
pub const ADC_BITS: u8 = 12;

/// One ADC channel sharing the converter with the other faders.
pub struct AdcInput<'a> {
    adc: &'a RefCell<Adc<'static, Blocking>>,
    channel: Channel<'static>,
}

impl<'a> AdcInput<'a> {
    #[must_use]
    pub fn new(adc: &'a RefCell<Adc<'static, Blocking>>, channel: Channel<'static>) -> Self {
        Self { adc, channel }
    }
}

impl AnalogInput for AdcInput<'_> {
    fn resolution_bits(&self) -> u8 {
        ADC_BITS
    }

    fn read_raw(&mut self) -> Option<u16> {
        let mut adc = self.adc.try_borrow_mut().ok()?;
        adc.blocking_read(&mut self.channel).ok()
    }
}
