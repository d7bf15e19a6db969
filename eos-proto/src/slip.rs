//! SLIP framing (RFC 1055) for the serial transport.
//!
//! Every frame is written as `END <escaped payload> END`. The leading `END`
//! flushes any line noise the receiver has accumulated since the last frame.

use crate::encode::EncodeError;

/// Frame delimiter.
pub const END: u8 = 0xC0;
/// Escape introducer.
pub const ESC: u8 = 0xDB;
/// Escaped [`END`].
pub const ESC_END: u8 = 0xDC;
/// Escaped [`ESC`].
pub const ESC_ESC: u8 = 0xDD;

/// Worst-case frame size for a payload of `payload_len` bytes.
#[inline]
#[must_use]
pub const fn max_frame_len(payload_len: usize) -> usize {
    payload_len * 2 + 2
}

#[inline]
fn escape(byte: u8) -> Option<[u8; 2]> {
    match byte {
        END => Some([ESC, ESC_END]),
        ESC => Some([ESC, ESC_ESC]),
        _ => None,
    }
}

/// Encode `payload` as one SLIP frame into `buf`.
///
/// Returns the number of bytes written.
///
/// # Errors
///
/// Returns [`EncodeError::BufferTooSmall`] if the escaped frame does not fit.
pub fn encode_frame(payload: &[u8], buf: &mut [u8]) -> Result<usize, EncodeError> {
    let mut pos = 0;
    let mut put = |bytes: &[u8]| -> Result<(), EncodeError> {
        let end = pos + bytes.len();
        buf.get_mut(pos..end)
            .ok_or(EncodeError::BufferTooSmall)?
            .copy_from_slice(bytes);
        pos = end;
        Ok(())
    };

    put(&[END])?;
    for &byte in payload {
        match escape(byte) {
            Some(pair) => put(&pair)?,
            None => put(&[byte])?,
        }
    }
    put(&[END])?;

    Ok(pos)
}

/// Streams SLIP frames to an `embedded_io::Write` sink.
///
/// Mirrors the begin / write / end sequence of a packet transport so the
/// gateway can treat both links alike.
#[cfg(feature = "embedded-io")]
pub struct SlipWriter<W> {
    inner: W,
}

#[cfg(feature = "embedded-io")]
impl<W: embedded_io::Write> SlipWriter<W> {
    /// Wrap a byte sink.
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Open a frame.
    pub fn begin_frame(&mut self) -> Result<(), W::Error> {
        self.inner.write_all(&[END])
    }

    /// Write payload bytes, escaping delimiters.
    pub fn write_payload(&mut self, payload: &[u8]) -> Result<(), W::Error> {
        let mut start = 0;
        for (i, &byte) in payload.iter().enumerate() {
            if let Some(pair) = escape(byte) {
                self.inner.write_all(&payload[start..i])?;
                self.inner.write_all(&pair)?;
                start = i + 1;
            }
        }
        self.inner.write_all(&payload[start..])
    }

    /// Close the frame and flush the sink.
    pub fn end_frame(&mut self) -> Result<(), W::Error> {
        self.inner.write_all(&[END])?;
        self.inner.flush()
    }

    /// Write one complete frame.
    pub fn write_frame(&mut self, payload: &[u8]) -> Result<(), W::Error> {
        self.begin_frame()?;
        self.write_payload(payload)?;
        self.end_frame()
    }

    /// Get a reference to the underlying sink.
    pub fn inner(&self) -> &W {
        &self.inner
    }

    /// Get a mutable reference to the underlying sink.
    pub fn inner_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    /// Unwrap the underlying sink.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_payload() {
        let mut buf = [0u8; 16];
        let len = encode_frame(b"abc", &mut buf).unwrap();
        assert_eq!(&buf[..len], &[END, b'a', b'b', b'c', END]);
    }

    #[test]
    fn test_escapes_delimiters() {
        let mut buf = [0u8; 16];
        let len = encode_frame(&[1, END, 2, ESC, 3], &mut buf).unwrap();
        assert_eq!(
            &buf[..len],
            &[END, 1, ESC, ESC_END, 2, ESC, ESC_ESC, 3, END]
        );
    }

    #[test]
    fn test_worst_case_fits_max_frame_len() {
        let payload = [END; 8];
        let mut buf = [0u8; max_frame_len(8)];
        assert_eq!(encode_frame(&payload, &mut buf), Ok(max_frame_len(8)));
    }

    #[test]
    fn test_buffer_too_small() {
        let mut buf = [0u8; 3];
        assert_eq!(
            encode_frame(b"abc", &mut buf),
            Err(EncodeError::BufferTooSmall)
        );
    }

    #[cfg(feature = "embedded-io")]
    #[test]
    fn test_slip_writer_matches_encode_frame() {
        extern crate std;
        use std::vec::Vec;

        struct Sink(Vec<u8>);

        impl embedded_io::ErrorType for Sink {
            type Error = core::convert::Infallible;
        }

        impl embedded_io::Write for Sink {
            fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
                self.0.extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> Result<(), Self::Error> {
                Ok(())
            }
        }

        let payload = [0x2F, END, 0x00, ESC, 0x7F];
        let mut writer = SlipWriter::new(Sink(Vec::new()));
        writer.write_frame(&payload).unwrap();

        let mut expected = [0u8; max_frame_len(5)];
        let len = encode_frame(&payload, &mut expected).unwrap();
        assert_eq!(writer.inner().0.as_slice(), &expected[..len]);
    }
}
