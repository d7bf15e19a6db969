//! SLIP frames over USB CDC-ACM.
//!
//! [`FrameQueue`] is the byte sink behind the gateway's serial link: it
//! collects one frame and pushes it into a [`FrameChannel`] on flush.
//! [`forward_frames`] drains that channel into the CDC-ACM bulk endpoint.

use defmt::{info, Format};
use embassy_rp::peripherals::USB;
use embassy_rp::usb::Driver;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_usb::class::cdc_acm::{CdcAcmClass, State};
use embassy_usb::driver::EndpointError;
use embassy_usb::Builder;
use eos_proto::MAX_FRAME_SIZE;
use heapless::Vec;

/// Maximum packet size of the CDC-ACM bulk endpoints.
pub const USB_PACKET_SIZE: u16 = 64;

/// Frames buffered between the control task and the USB endpoint.
pub const FRAME_QUEUE_DEPTH: usize = 16;

/// One complete SLIP frame.
pub type Frame = Vec<u8, MAX_FRAME_SIZE>;

/// Queue of complete frames awaiting USB transfer.
pub type FrameChannel = Channel<CriticalSectionRawMutex, Frame, FRAME_QUEUE_DEPTH>;

/// Error type for [`FrameQueue`] writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Format)]
pub enum QueueError {
    /// The frame exceeded [`MAX_FRAME_SIZE`].
    Overflow,
    /// The queue was full; the frame was dropped.
    Full,
}

impl embedded_io::Error for QueueError {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self {
            Self::Overflow => embedded_io::ErrorKind::OutOfMemory,
            Self::Full => embedded_io::ErrorKind::Other,
        }
    }
}

/// Non-blocking writer that turns each flushed byte run into one queued frame.
pub struct FrameQueue<'a> {
    channel: &'a FrameChannel,
    pending: Frame,
    overflow: bool,
}

impl<'a> FrameQueue<'a> {
    #[must_use]
    pub fn new(channel: &'a FrameChannel) -> Self {
        Self {
            channel,
            pending: Vec::new(),
            overflow: false,
        }
    }
}

impl embedded_io::ErrorType for FrameQueue<'_> {
    type Error = QueueError;
}

impl embedded_io::Write for FrameQueue<'_> {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        if self.pending.extend_from_slice(buf).is_err() {
            self.overflow = true;
            return Err(QueueError::Overflow);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        let frame = core::mem::take(&mut self.pending);
        if core::mem::take(&mut self.overflow) {
            return Err(QueueError::Overflow);
        }
        if frame.is_empty() {
            return Ok(());
        }
        self.channel.try_send(frame).map_err(|_| QueueError::Full)
    }
}

/// Configure the CDC-ACM class in the USB builder.
pub fn configure_usb_serial<'d>(
    builder: &mut Builder<'d, Driver<'d, USB>>,
    state: &'d mut State<'d>,
) -> CdcAcmClass<'d, Driver<'d, USB>> {
    CdcAcmClass::new(builder, state, USB_PACKET_SIZE)
}

/// Forward queued frames to the host for as long as the device runs.
///
/// Frames queued while no host is attached are sent once one connects, up
/// to the queue depth.
pub async fn forward_frames(
    class: &mut CdcAcmClass<'static, Driver<'static, USB>>,
    frames: &FrameChannel,
) -> ! {
    loop {
        class.wait_connection().await;
        info!("USB serial connected");
        loop {
            let frame = frames.receive().await;
            if let Err(EndpointError::Disabled) = write_frame(class, &frame).await {
                break;
            }
        }
        info!("USB serial disconnected");
    }
}

/// Write one frame as full-size packets, terminated by a short packet.
async fn write_frame(
    class: &mut CdcAcmClass<'static, Driver<'static, USB>>,
    frame: &[u8],
) -> Result<(), EndpointError> {
    let packet_size = usize::from(USB_PACKET_SIZE);
    for chunk in frame.chunks(packet_size) {
        class.write_packet(chunk).await?;
    }
    if frame.len() % packet_size == 0 {
        class.write_packet(&[]).await?;
    }
    Ok(())
}
