//! Builder API for composing hierarchical addresses and their argument.
//!
//! Capacity overflow is latched while segments are appended and reported
//! once by [`MessageBuilder::build`], so call sites stay a single chain.
//!
//! # Example
//!
//! ```
//! use eos_proto::{MessageBuilder, OscArg};
//!
//! let msg = MessageBuilder::new("/eos/wheel")
//!     .segment("fine")
//!     .segment("Pan")
//!     .int(-1)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(msg.address(), "/eos/wheel/fine/Pan");
//! assert_eq!(msg.arg, OscArg::Int(-1));
//! ```

use core::fmt::{Display, Write};

use crate::types::{bounded, Address, CapacityError, OscArg, OscMessage};

/// Fluent builder for an [`OscMessage`].
#[derive(Debug, Clone)]
#[must_use]
pub struct MessageBuilder {
    address: Address,
    arg: OscArg,
    overflow: bool,
}

impl MessageBuilder {
    /// Start from a root address such as `/eos/fader`.
    pub fn new(root: &str) -> Self {
        let mut builder = Self {
            address: Address::new(),
            arg: OscArg::None,
            overflow: false,
        };
        if builder.address.push_str(root).is_err() {
            builder.overflow = true;
        }
        builder
    }

    /// Append `/<name>`.
    pub fn segment(mut self, name: &str) -> Self {
        if self.address.push('/').is_err() || self.address.push_str(name).is_err() {
            self.overflow = true;
        }
        self
    }

    /// Append `/<value>` using its `Display` form (bank, fader or macro numbers).
    pub fn number<T: Display>(mut self, value: T) -> Self {
        if write!(self.address, "/{}", value).is_err() {
            self.overflow = true;
        }
        self
    }

    /// Append `name` only when `when` holds.
    pub fn segment_if(self, when: bool, name: &str) -> Self {
        if when {
            self.segment(name)
        } else {
            self
        }
    }

    /// Carry a 32-bit integer argument.
    pub fn int(mut self, value: i32) -> Self {
        self.arg = OscArg::Int(value);
        self
    }

    /// Carry a 32-bit float argument.
    pub fn float(mut self, value: f32) -> Self {
        self.arg = OscArg::Float(value);
        self
    }

    /// Carry a string argument.
    pub fn string(mut self, value: &str) -> Self {
        match bounded(value) {
            Ok(text) => self.arg = OscArg::Str(text),
            Err(CapacityError) => self.overflow = true,
        }
        self
    }

    /// Carry an already constructed argument.
    pub fn arg(mut self, arg: OscArg) -> Self {
        self.arg = arg;
        self
    }

    /// Finish the message.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError`] if the address or the string argument
    /// overflowed at any point while building.
    pub fn build(self) -> Result<OscMessage, CapacityError> {
        if self.overflow {
            return Err(CapacityError);
        }
        Ok(OscMessage {
            address: self.address,
            arg: self.arg,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MAX_ADDRESS_LEN;

    #[test]
    fn test_builds_fader_address() {
        let msg = MessageBuilder::new("/eos/fader")
            .number(1u8)
            .number(3u8)
            .segment("fire")
            .int(1)
            .build()
            .unwrap();
        assert_eq!(msg.address(), "/eos/fader/1/3/fire");
        assert_eq!(msg.arg, OscArg::Int(1));
    }

    #[test]
    fn test_segment_if() {
        let plain = MessageBuilder::new("/eos/active/wheel")
            .segment_if(false, "fine")
            .number(2u8)
            .build()
            .unwrap();
        assert_eq!(plain.address(), "/eos/active/wheel/2");

        let fine = MessageBuilder::new("/eos/active/wheel")
            .segment_if(true, "fine")
            .number(2u8)
            .build()
            .unwrap();
        assert_eq!(fine.address(), "/eos/active/wheel/fine/2");
    }

    #[test]
    fn test_overflow_is_reported_at_build() {
        let mut builder = MessageBuilder::new("/eos");
        for _ in 0..MAX_ADDRESS_LEN {
            builder = builder.segment("x");
        }
        assert_eq!(builder.build(), Err(CapacityError));
    }

    #[test]
    fn test_string_arg() {
        let msg = MessageBuilder::new("/eos/cmd")
            .string("Chan 1 Full#")
            .build()
            .unwrap();
        assert_eq!(msg.arg, OscArg::string("Chan 1 Full#").unwrap());
    }
}
