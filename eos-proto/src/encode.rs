//! OSC 1.0 binary encoding of [`OscMessage`].
//!
//! # Wire Format
//!
//! ```text
//! <address>\0{1-4} ,<tag>\0{1-4} <argument>
//! ```
//!
//! - strings are NUL terminated and zero padded to a multiple of 4 bytes
//! - `i` arguments are big-endian two's complement, `f` arguments big-endian
//!   IEEE-754, `s` arguments are padded strings
//!
//! # Example
//!
//! ```
//! use eos_proto::{Encode, OscMessage};
//!
//! let msg = OscMessage::new("/eos/ping").unwrap();
//! let mut buf = [0u8; 32];
//! let len = msg.encode(&mut buf).unwrap();
//! assert_eq!(&buf[..len], b"/eos/ping\0\0\0,\0\0\0");
//! ```

use core::fmt;

use crate::types::{OscArg, OscMessage, MAX_ADDRESS_LEN, MAX_STRING_LEN};

/// Upper bound on the encoded size of any [`OscMessage`].
///
/// Breakdown: address(64 + NUL, padded to 68) + type tags(4) + string
/// argument(96 + NUL, padded to 100).
pub const MAX_MESSAGE_SIZE: usize =
    padded_len(MAX_ADDRESS_LEN) + 4 + padded_len(MAX_STRING_LEN);

/// Size of a NUL-terminated string of `len` bytes after padding to 4.
#[inline]
#[must_use]
pub const fn padded_len(len: usize) -> usize {
    (len / 4 + 1) * 4
}

/// Error type for encoding operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeError {
    /// The output buffer is too small to hold the encoded message.
    BufferTooSmall,
    /// A write operation failed (for I/O adapters).
    WriteError,
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BufferTooSmall => write!(f, "buffer too small"),
            Self::WriteError => write!(f, "write error"),
        }
    }
}

/// Cursor over an output buffer that has already been bounds-checked.
struct EncodeBuf<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> EncodeBuf<'a> {
    #[inline]
    fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    #[inline]
    fn write_slice(&mut self, bytes: &[u8]) {
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
    }

    /// Write `bytes` followed by 1-4 NUL bytes so the total is 4-aligned.
    #[inline]
    fn write_padded(&mut self, bytes: &[u8]) {
        let end = self.pos + padded_len(bytes.len());
        self.write_slice(bytes);
        self.buf[self.pos..end].fill(0);
        self.pos = end;
    }

    #[inline]
    fn finish(self) -> usize {
        self.pos
    }
}

/// Extension trait for encoding messages into OSC packets.
pub trait Encode {
    /// Exact number of bytes [`Encode::encode`] will write.
    fn encoded_len(&self) -> usize;

    /// Encode into the provided buffer.
    ///
    /// Returns the number of bytes written on success.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::BufferTooSmall`] if the buffer is not large enough.
    fn encode(&self, buf: &mut [u8]) -> Result<usize, EncodeError>;

    /// Encode into a `heapless::Vec`.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::BufferTooSmall`] if `N` is not large enough.
    fn encode_to_vec<const N: usize>(&self) -> Result<heapless::Vec<u8, N>, EncodeError> {
        let mut vec = heapless::Vec::new();
        vec.resize(self.encoded_len(), 0)
            .map_err(|_| EncodeError::BufferTooSmall)?;
        let len = self.encode(&mut vec)?;
        vec.truncate(len);
        Ok(vec)
    }

    /// Encode to an `embedded_io::Write` implementation.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::WriteError`] if the write fails.
    #[cfg(feature = "embedded-io")]
    fn encode_io<W: embedded_io::Write>(&self, writer: &mut W) -> Result<(), EncodeError> {
        let mut buf = [0u8; MAX_MESSAGE_SIZE];
        let len = self.encode(&mut buf)?;
        writer
            .write_all(&buf[..len])
            .map_err(|_| EncodeError::WriteError)
    }
}

impl Encode for OscMessage {
    fn encoded_len(&self) -> usize {
        let arg_len = match &self.arg {
            OscArg::None => 0,
            OscArg::Int(_) | OscArg::Float(_) => 4,
            OscArg::Str(s) => padded_len(s.len()),
        };
        padded_len(self.address.len()) + 4 + arg_len
    }

    fn encode(&self, buf: &mut [u8]) -> Result<usize, EncodeError> {
        if buf.len() < self.encoded_len() {
            return Err(EncodeError::BufferTooSmall);
        }

        let mut eb = EncodeBuf::new(buf);
        eb.write_padded(self.address.as_bytes());

        match self.arg.type_tag() {
            Some(tag) => eb.write_padded(&[b',', tag]),
            None => eb.write_padded(b","),
        }

        match &self.arg {
            OscArg::None => {}
            OscArg::Int(v) => eb.write_slice(&v.to_be_bytes()),
            OscArg::Float(v) => eb.write_slice(&v.to_be_bytes()),
            OscArg::Str(s) => eb.write_padded(s.as_bytes()),
        }

        Ok(eb.finish())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::builder::MessageBuilder;
    use rosc::{OscPacket, OscType};

    fn decode(bytes: &[u8]) -> rosc::OscMessage {
        match rosc::decoder::decode_udp(bytes).unwrap().1 {
            OscPacket::Message(msg) => msg,
            OscPacket::Bundle(_) => panic!("expected a message"),
        }
    }

    #[test]
    fn test_padded_len() {
        assert_eq!(padded_len(0), 4);
        assert_eq!(padded_len(3), 4);
        assert_eq!(padded_len(4), 8);
        assert_eq!(padded_len(9), 12);
    }

    #[test]
    fn test_encode_int_layout() {
        let msg = MessageBuilder::new("/eos/key/go")
            .int(1)
            .build()
            .unwrap();
        let mut buf = [0u8; 64];
        let len = msg.encode(&mut buf).unwrap();
        assert_eq!(len, msg.encoded_len());
        assert_eq!(
            &buf[..len],
            b"/eos/key/go\0,i\0\0\0\0\0\x01".as_slice()
        );
    }

    #[test]
    fn test_encode_decodes_with_rosc() {
        let msg = MessageBuilder::new("/eos/fader/1/2")
            .float(0.25)
            .build()
            .unwrap();
        let mut buf = [0u8; MAX_MESSAGE_SIZE];
        let len = msg.encode(&mut buf).unwrap();

        let decoded = decode(&buf[..len]);
        assert_eq!(decoded.addr, "/eos/fader/1/2");
        assert_eq!(decoded.args, std::vec![OscType::Float(0.25)]);
    }

    #[test]
    fn test_encode_string_decodes_with_rosc() {
        let msg = MessageBuilder::new("/eos/cmd")
            .string("Chan 1 At Full#")
            .build()
            .unwrap();
        let vec = msg.encode_to_vec::<MAX_MESSAGE_SIZE>().unwrap();

        let decoded = decode(&vec);
        assert_eq!(decoded.addr, "/eos/cmd");
        assert_eq!(
            decoded.args,
            std::vec![OscType::String("Chan 1 At Full#".into())]
        );
    }

    #[test]
    fn test_encode_negative_int_decodes_with_rosc() {
        let msg = MessageBuilder::new("/eos/wheel/Pan")
            .int(-4)
            .build()
            .unwrap();
        let vec = msg.encode_to_vec::<MAX_MESSAGE_SIZE>().unwrap();
        assert_eq!(decode(&vec).args, std::vec![OscType::Int(-4)]);
    }

    #[test]
    fn test_encode_without_arg_decodes_with_rosc() {
        let msg = OscMessage::new("/eos/fader/1/config/1/10").unwrap();
        let vec = msg.encode_to_vec::<MAX_MESSAGE_SIZE>().unwrap();
        let decoded = decode(&vec);
        assert_eq!(decoded.addr, "/eos/fader/1/config/1/10");
        assert!(decoded.args.is_empty());
    }

    #[test]
    fn test_encode_buffer_too_small() {
        let msg = OscMessage::new("/eos/ping").unwrap();
        let mut buf = [0u8; 8];
        assert_eq!(msg.encode(&mut buf), Err(EncodeError::BufferTooSmall));
    }

    #[test]
    fn test_largest_message_fits() {
        let address = [b'a'; MAX_ADDRESS_LEN];
        let text = [b'b'; MAX_STRING_LEN];
        let msg = MessageBuilder::new(core::str::from_utf8(&address).unwrap())
            .string(core::str::from_utf8(&text).unwrap())
            .build()
            .unwrap();
        assert_eq!(msg.encoded_len(), MAX_MESSAGE_SIZE);
        assert!(msg.encode_to_vec::<MAX_MESSAGE_SIZE>().is_ok());
    }
}
