//! Outbound message model: [`OscMessage`], [`OscArg`] and their size limits.

use core::fmt;
use heapless::String;

/// Maximum length of an OSC address in bytes.
pub const MAX_ADDRESS_LEN: usize = 64;

/// Maximum length of a string argument in bytes.
pub const MAX_STRING_LEN: usize = 96;

/// Argument of an edge message when the line rose.
pub const EDGE_UP: i32 = 0;

/// Argument of an edge message when the line fell.
pub const EDGE_DOWN: i32 = 1;

/// Argument of a parameter subscription request.
pub const SUBSCRIBE: i32 = 1;

/// Argument of a parameter unsubscription request.
pub const UNSUBSCRIBE: i32 = 0;

/// Bounded address string.
pub type Address = String<MAX_ADDRESS_LEN>;

/// Bounded string argument.
pub type Text = String<MAX_STRING_LEN>;

/// A string did not fit into its fixed-capacity buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CapacityError;

impl fmt::Display for CapacityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "string exceeds buffer capacity")
    }
}

/// Copy `s` into a bounded string.
pub fn bounded<const N: usize>(s: &str) -> Result<String<N>, CapacityError> {
    let mut out = String::new();
    out.push_str(s).map_err(|_| CapacityError)?;
    Ok(out)
}

/// The single optional argument carried by an outbound message.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum OscArg {
    /// No argument (empty type tag string).
    #[default]
    None,
    /// 32-bit signed integer (`i`).
    Int(i32),
    /// 32-bit IEEE-754 float (`f`).
    Float(f32),
    /// NUL-terminated string (`s`).
    Str(Text),
}

impl OscArg {
    /// Build a string argument, failing if it exceeds [`MAX_STRING_LEN`].
    pub fn string(s: &str) -> Result<Self, CapacityError> {
        bounded(s).map(Self::Str)
    }

    /// OSC type tag character, or `None` when there is no argument.
    #[inline]
    #[must_use]
    pub const fn type_tag(&self) -> Option<u8> {
        match self {
            Self::None => None,
            Self::Int(_) => Some(b'i'),
            Self::Float(_) => Some(b'f'),
            Self::Str(_) => Some(b's'),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for OscArg {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::None => defmt::write!(f, "None"),
            Self::Int(v) => defmt::write!(f, "Int({=i32})", v),
            Self::Float(v) => defmt::write!(f, "Float({=f32})", v),
            Self::Str(s) => defmt::write!(f, "Str({=str})", s.as_str()),
        }
    }
}

/// An addressed message with zero or one typed argument.
///
/// Built fresh for every emission and dropped once the transport has it.
#[derive(Debug, Clone, PartialEq)]
pub struct OscMessage {
    pub address: Address,
    pub arg: OscArg,
}

impl OscMessage {
    /// Create a message without an argument.
    pub fn new(address: &str) -> Result<Self, CapacityError> {
        Ok(Self {
            address: bounded(address)?,
            arg: OscArg::None,
        })
    }

    /// Create a message with the given argument.
    pub fn with_arg(address: &str, arg: OscArg) -> Result<Self, CapacityError> {
        Ok(Self {
            address: bounded(address)?,
            arg,
        })
    }

    /// The address as a string slice.
    #[inline]
    #[must_use]
    pub fn address(&self) -> &str {
        self.address.as_str()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for OscMessage {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=str} {}", self.address.as_str(), self.arg)
    }
}
