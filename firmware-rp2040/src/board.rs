//! Pin assignment and the concrete control set.
//!
//! # Hardware Configuration
//!
//! All digital inputs use the internal pull-up; buttons switch to ground.
//!
//! | Function            | GPIO   | Description |
//! |---------------------|--------|-------------|
//! | Shift               | 2      | Global shift modifier |
//! | Pan encoder A/B     | 3, 4   | `/eos/wheel/Pan` |
//! | Pan encoder button  | 5      | Homes Pan |
//! | Tilt encoder A/B    | 6, 7   | `/eos/wheel/Tilt` |
//! | Intensity wheel A/B | 8, 9   | `/eos/active/wheel/1` |
//! | Wheel fine button   | 10     | Fine mode while held |
//! | GO key              | 14     | `/eos/key/go_0` |
//! | STOP key            | 15     | `/eos/key/stop` |
//! | Macro 1             | 16     | `/eos/macro/1/fire` |
//! | Highlight           | 17     | Sends a fixed command line |
//! | Fader 1 fire/stop   | 18, 19 | `/eos/fader/1/1/fire`, `/stop` |
//! | Sub 1 bump          | 20     | `/eos/sub/1/fire` |
//! | Fader 1 wiper       | 26     | ADC0, `/eos/fader/1/1` |
//! | Sub 1 wiper         | 27     | ADC1, `/eos/sub/1` |
//! | LED                 | 25     | On-board LED (heartbeat) |

use embassy_rp::adc::Channel;
use embassy_rp::gpio::Input;
use eos_core::{
    ButtonMode, CapacityError, Control, Direction, Encoder, Fader, Key, Macro, MessageSink,
    Modifier, OscArg, OscButton, Submaster, Wheel,
};

use crate::analog::AdcInput;

/// Digital input type shared by every control.
pub type Pin = Input<'static>;

/// Fader bank used by the on-board faders.
pub const FADER_BANK: u8 = 1;

/// Command line sent by the highlight button.
pub const HIGHLIGHT_COMMAND: &str = "Highlight#";

/// Pins and ADC channels of the surface, already configured.
pub struct SurfacePins {
    pub pan_a: Pin,
    pub pan_b: Pin,
    pub pan_button: Pin,
    pub tilt_a: Pin,
    pub tilt_b: Pin,
    pub wheel_a: Pin,
    pub wheel_b: Pin,
    pub wheel_fine: Pin,
    pub go: Pin,
    pub stop: Pin,
    pub macro_1: Pin,
    pub highlight: Pin,
    pub fader_fire: Pin,
    pub fader_stop: Pin,
    pub sub_fire: Pin,
    pub fader_wiper: Channel<'static>,
    pub sub_wiper: Channel<'static>,
}

/// Every control of the board, polled together.
pub struct Surface {
    pan: Encoder<'static, Pin>,
    tilt: Encoder<'static, Pin>,
    intensity: Wheel<'static, Pin>,
    go: Key<Pin>,
    stop: Key<Pin>,
    macro_1: Macro<Pin>,
    highlight: OscButton<Pin>,
    fader: Fader<Pin, AdcInput<'static>>,
    sub: Submaster<Pin, AdcInput<'static>>,
}

impl Surface {
    /// Build the surface; `analog` wraps each wiper channel.
    pub fn new(
        pins: SurfacePins,
        shift: &'static dyn Modifier,
        analog: impl Fn(Channel<'static>) -> AdcInput<'static>,
        now_ms: u64,
    ) -> Result<Self, CapacityError> {
        let SurfacePins {
            pan_a,
            pan_b,
            pan_button,
            tilt_a,
            tilt_b,
            wheel_a,
            wheel_b,
            wheel_fine,
            go,
            stop,
            macro_1,
            highlight,
            fader_fire,
            fader_stop,
            sub_fire,
            fader_wiper,
            sub_wiper,
        } = pins;

        Ok(Self {
            pan: Encoder::new(pan_a, pan_b, Direction::Forward, "Pan")?
                .with_button(pan_button, ButtonMode::Home)?
                .with_shift(shift),
            tilt: Encoder::new(tilt_a, tilt_b, Direction::Reverse, "Tilt")?.with_shift(shift),
            intensity: Wheel::new(wheel_a, wheel_b, Direction::Forward, 1)
                .with_fine_button(wheel_fine)
                .with_shift(shift),
            go: Key::new(go, "go_0")?,
            stop: Key::new(stop, "stop")?,
            macro_1: Macro::new(macro_1, 1)?,
            highlight: OscButton::new(highlight, "/eos/newcmd", OscArg::string(HIGHLIGHT_COMMAND)?)?,
            fader: Fader::new(
                analog(fader_wiper),
                Some(fader_fire),
                Some(fader_stop),
                1,
                FADER_BANK,
                now_ms,
            )?,
            sub: Submaster::new(analog(sub_wiper), Some(sub_fire), 1, now_ms)?,
        })
    }
}

impl Control for Surface {
    fn update<S: MessageSink + ?Sized>(&mut self, sink: &mut S, now_ms: u64) {
        self.pan.update(sink, now_ms);
        self.tilt.update(sink, now_ms);
        self.intensity.update(sink, now_ms);
        self.go.update(sink, now_ms);
        self.stop.update(sink, now_ms);
        self.macro_1.update(sink, now_ms);
        self.highlight.update(sink, now_ms);
        self.fader.update(sink, now_ms);
        self.sub.update(sink, now_ms);
    }
}
