//! Compile-time tuning constants and control options.

/// Motion multiplier for intensity wheels while the shift or fine modifier is held.
pub const INTENSITY_ACCEL: i32 = 4;

/// Motion multiplier applied to every wheel tick.
pub const WHEEL_ACCEL: i32 = 1;

/// Minimum time between two analog samples of a fader.
pub const FADER_UPDATE_INTERVAL_MS: u64 = 40;

/// Half-width of the fader jitter deadband, in 8-bit units.
pub const FADER_THRESHOLD: i16 = 4;

/// Full scale of a reduced (8-bit) fader reading.
pub const FADER_FULL_SCALE: i16 = 255;

/// Encoder parameter names that address the intensity wheel.
pub const INTENSITY_PARAMETERS: [&str; 2] = ["Intens", "intens"];

/// Wheel index that addresses the intensity wheel.
pub const INTENSITY_WHEEL_INDEX: u8 = 1;

/// Counting direction of a quadrature encoder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    #[default]
    Forward,
    Reverse,
}

/// Function of the push button built into an encoder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonMode {
    /// Sends `/eos/param/<parameter>/home` edges.
    #[default]
    Home,
    /// Switches the encoder into fine mode while held.
    Fine,
}
