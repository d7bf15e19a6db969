//! Transport gateway: the single path every control's messages take to the console.
//!
//! A [`Gateway`] owns exactly one [`Link`], either a [`NetworkLink`] sending one
//! UDP datagram per message or a [`SerialLink`] writing one SLIP frame per
//! message. Controls only see the [`MessageSink`] trait.

use core::fmt;
use core::net::{Ipv4Addr, SocketAddrV4};

use eos_proto::slip::SlipWriter;
use eos_proto::{Encode, EncodeError, OscMessage, MAX_MESSAGE_SIZE};

/// IPv4 destination of a network packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Endpoint {
    pub ip: [u8; 4],
    pub port: u16,
}

impl Endpoint {
    #[must_use]
    pub const fn new(ip: [u8; 4], port: u16) -> Self {
        Self { ip, port }
    }
}

impl From<SocketAddrV4> for Endpoint {
    fn from(addr: SocketAddrV4) -> Self {
        Self::new(addr.ip().octets(), addr.port())
    }
}

impl From<Endpoint> for SocketAddrV4 {
    fn from(endpoint: Endpoint) -> Self {
        SocketAddrV4::new(Ipv4Addr::from(endpoint.ip), endpoint.port)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&SocketAddrV4::from(*self), f)
    }
}

/// Which transport a gateway was built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportConfig {
    /// One datagram per message to a default destination, overridable per call.
    NetworkPacket { destination: Endpoint },
    /// One SLIP frame per message on a local byte stream; no addressing.
    FramedSerial,
}

/// Error type for transport operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// Socket or serial I/O error.
    Io,
    /// The transport could not accept the data right now.
    Busy,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io => write!(f, "transport I/O error"),
            Self::Busy => write!(f, "transport busy"),
        }
    }
}

/// Error type for gateway sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GatewayError {
    /// The message could not be encoded.
    Encode(EncodeError),
    /// The link rejected the packet.
    Transport(TransportError),
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encode(e) => write!(f, "encode failed: {}", e),
            Self::Transport(e) => write!(f, "send failed: {}", e),
        }
    }
}

/// Anything that can carry one datagram to an IPv4 endpoint.
pub trait PacketSocket {
    type Error: fmt::Debug;

    /// Send `payload` as a single datagram (begin packet, write, end packet).
    fn send_to(&mut self, payload: &[u8], destination: Endpoint) -> Result<(), Self::Error>;
}

#[cfg(feature = "std")]
impl PacketSocket for std::net::UdpSocket {
    type Error = std::io::Error;

    fn send_to(&mut self, payload: &[u8], destination: Endpoint) -> Result<(), Self::Error> {
        std::net::UdpSocket::send_to(self, payload, SocketAddrV4::from(destination)).map(|_| ())
    }
}

/// The active transport of a [`Gateway`].
pub trait Link {
    /// The transport mode and default destination.
    fn config(&self) -> TransportConfig;

    /// Put one encoded packet on the wire.
    ///
    /// `destination` overrides the default for this packet only; links
    /// without addressing ignore it.
    fn transmit(
        &mut self,
        packet: &[u8],
        destination: Option<Endpoint>,
    ) -> Result<(), TransportError>;
}

/// Network-packet transport: one datagram per message.
pub struct NetworkLink<S> {
    socket: S,
    destination: Endpoint,
}

impl<S: PacketSocket> NetworkLink<S> {
    /// Send to `destination` unless a call overrides it.
    pub fn new(socket: S, destination: Endpoint) -> Self {
        Self {
            socket,
            destination,
        }
    }

    /// Get a reference to the socket.
    pub fn socket(&self) -> &S {
        &self.socket
    }

    /// Decompose into socket and default destination.
    pub fn into_parts(self) -> (S, Endpoint) {
        (self.socket, self.destination)
    }
}

impl<S: PacketSocket> Link for NetworkLink<S> {
    fn config(&self) -> TransportConfig {
        TransportConfig::NetworkPacket {
            destination: self.destination,
        }
    }

    fn transmit(
        &mut self,
        packet: &[u8],
        destination: Option<Endpoint>,
    ) -> Result<(), TransportError> {
        let destination = destination.unwrap_or(self.destination);
        self.socket.send_to(packet, destination).map_err(|_| {
            warn!("datagram to {} failed", destination);
            TransportError::Io
        })
    }
}

/// Framed-serial transport: one SLIP frame per message.
pub struct SerialLink<W> {
    writer: SlipWriter<W>,
}

impl<W: embedded_io::Write> SerialLink<W> {
    /// Frame messages onto `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer: SlipWriter::new(writer),
        }
    }

    /// Get a reference to the underlying byte sink.
    pub fn writer(&self) -> &W {
        self.writer.inner()
    }

    /// Get a mutable reference to the underlying byte sink.
    pub fn writer_mut(&mut self) -> &mut W {
        self.writer.inner_mut()
    }

    /// Unwrap the underlying byte sink.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: embedded_io::Write> Link for SerialLink<W> {
    fn config(&self) -> TransportConfig {
        TransportConfig::FramedSerial
    }

    fn transmit(
        &mut self,
        packet: &[u8],
        _destination: Option<Endpoint>,
    ) -> Result<(), TransportError> {
        self.writer.write_frame(packet).map_err(|_| {
            warn!("serial frame write failed");
            TransportError::Io
        })
    }
}

/// Destination for outbound messages, as seen by the controls.
///
/// Sending is fire-and-forget: implementations absorb transport failures.
pub trait MessageSink {
    /// Send a message, optionally overriding the destination (network mode only).
    fn send_to(&mut self, message: &OscMessage, destination: Option<Endpoint>);

    /// Send a message to the default destination.
    fn send(&mut self, message: &OscMessage) {
        self.send_to(message, None);
    }
}

impl<T: MessageSink + ?Sized> MessageSink for &mut T {
    fn send_to(&mut self, message: &OscMessage, destination: Option<Endpoint>) {
        (**self).send_to(message, destination);
    }
}

/// Encodes messages and forwards them over the single active link.
pub struct Gateway<L> {
    link: L,
}

impl<L: Link> Gateway<L> {
    /// Create a gateway over the given link.
    pub fn new(link: L) -> Self {
        Self { link }
    }

    /// The transport mode this gateway was built with.
    pub fn config(&self) -> TransportConfig {
        self.link.config()
    }

    /// Encode and send one message, reporting failures.
    ///
    /// Exactly one packet or frame is written per successful call.
    pub fn try_send(
        &mut self,
        message: &OscMessage,
        destination: Option<Endpoint>,
    ) -> Result<(), GatewayError> {
        let mut buf = [0u8; MAX_MESSAGE_SIZE];
        let len = message.encode(&mut buf).map_err(GatewayError::Encode)?;
        self.link
            .transmit(&buf[..len], destination)
            .map_err(GatewayError::Transport)
    }

    /// Get a reference to the link.
    pub fn link(&self) -> &L {
        &self.link
    }

    /// Get a mutable reference to the link.
    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    /// Unwrap the link.
    pub fn into_inner(self) -> L {
        self.link
    }
}

impl<L: Link> MessageSink for Gateway<L> {
    fn send_to(&mut self, message: &OscMessage, destination: Option<Endpoint>) {
        trace!("send {:?}", message);
        if let Err(e) = self.try_send(message, destination) {
            warn!("dropped {}: {:?}", message.address(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use eos_proto::{slip, MessageBuilder, OscArg};
    use std::vec::Vec;

    struct MockSocket {
        sent: Vec<(Vec<u8>, Endpoint)>,
        fail: bool,
    }

    impl PacketSocket for MockSocket {
        type Error = ();

        fn send_to(&mut self, payload: &[u8], destination: Endpoint) -> Result<(), ()> {
            if self.fail {
                return Err(());
            }
            self.sent.push((payload.to_vec(), destination));
            Ok(())
        }
    }

    struct MockSerial {
        bytes: Vec<u8>,
        flushes: usize,
    }

    impl embedded_io::ErrorType for MockSerial {
        type Error = core::convert::Infallible;
    }

    impl embedded_io::Write for MockSerial {
        fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            self.bytes.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            self.flushes += 1;
            Ok(())
        }
    }

    const CONSOLE: Endpoint = Endpoint::new([192, 168, 1, 100], 8000);

    fn key_go() -> OscMessage {
        MessageBuilder::new("/eos/key/go").int(1).build().unwrap()
    }

    fn network_gateway() -> Gateway<NetworkLink<MockSocket>> {
        Gateway::new(NetworkLink::new(
            MockSocket {
                sent: Vec::new(),
                fail: false,
            },
            CONSOLE,
        ))
    }

    #[test]
    fn test_network_sends_one_datagram_to_default() {
        let mut gateway = network_gateway();
        gateway.send(&key_go());

        let sent = &gateway.link().socket().sent;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].1, CONSOLE);
        let decoded = rosc::decoder::decode_udp(&sent[0].0).unwrap().1;
        match decoded {
            rosc::OscPacket::Message(msg) => {
                assert_eq!(msg.addr, "/eos/key/go");
                assert_eq!(msg.args, std::vec![rosc::OscType::Int(1)]);
            }
            rosc::OscPacket::Bundle(_) => panic!("expected a message"),
        }
    }

    #[test]
    fn test_network_override_applies_to_one_call() {
        let other = Endpoint::new([10, 0, 0, 7], 9000);
        let mut gateway = network_gateway();
        gateway.send_to(&key_go(), Some(other));
        gateway.send(&key_go());

        let sent = &gateway.link().socket().sent;
        assert_eq!(sent[0].1, other);
        assert_eq!(sent[1].1, CONSOLE);
    }

    #[test]
    fn test_network_config() {
        let gateway = network_gateway();
        assert_eq!(
            gateway.config(),
            TransportConfig::NetworkPacket {
                destination: CONSOLE
            }
        );
    }

    #[test]
    fn test_transport_failure_is_reported_but_not_raised() {
        let mut gateway = Gateway::new(NetworkLink::new(
            MockSocket {
                sent: Vec::new(),
                fail: true,
            },
            CONSOLE,
        ));
        assert_eq!(
            gateway.try_send(&key_go(), None),
            Err(GatewayError::Transport(TransportError::Io))
        );
        // Fire-and-forget path swallows the same failure.
        gateway.send(&key_go());
    }

    #[test]
    fn test_serial_writes_one_frame_and_ignores_override() {
        let mut gateway = Gateway::new(SerialLink::new(MockSerial {
            bytes: Vec::new(),
            flushes: 0,
        }));
        assert_eq!(gateway.config(), TransportConfig::FramedSerial);

        let msg = MessageBuilder::new("/eos/fader/1/1")
            .float(1.0)
            .build()
            .unwrap();
        gateway.send_to(&msg, Some(CONSOLE));

        let mut packet = [0u8; MAX_MESSAGE_SIZE];
        let len = msg.encode(&mut packet).unwrap();
        let mut frame = [0u8; eos_proto::MAX_FRAME_SIZE];
        let framed = slip::encode_frame(&packet[..len], &mut frame).unwrap();

        let serial = gateway.link().writer();
        assert_eq!(serial.bytes.as_slice(), &frame[..framed]);
        assert_eq!(serial.flushes, 1);
    }

    #[test]
    fn test_endpoint_conversions() {
        let addr = SocketAddrV4::new(Ipv4Addr::new(10, 101, 1, 2), 3032);
        let endpoint = Endpoint::from(addr);
        assert_eq!(endpoint, Endpoint::new([10, 101, 1, 2], 3032));
        assert_eq!(SocketAddrV4::from(endpoint), addr);
        assert_eq!(std::format!("{}", endpoint), "10.101.1.2:3032");
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_udp_loopback() {
        use std::net::UdpSocket;

        let receiver = UdpSocket::bind("127.0.0.1:0").unwrap();
        receiver
            .set_read_timeout(Some(std::time::Duration::from_secs(2)))
            .unwrap();
        let port = receiver.local_addr().unwrap().port();

        let sender = UdpSocket::bind("127.0.0.1:0").unwrap();
        let mut gateway = Gateway::new(NetworkLink::new(
            sender,
            Endpoint::new([127, 0, 0, 1], port),
        ));
        let msg = MessageBuilder::new("/eos/ping")
            .arg(OscArg::string("hello").unwrap())
            .build()
            .unwrap();
        gateway.try_send(&msg, None).unwrap();

        let mut buf = [0u8; 256];
        let len = receiver.recv(&mut buf).unwrap();
        match rosc::decoder::decode_udp(&buf[..len]).unwrap().1 {
            rosc::OscPacket::Message(decoded) => {
                assert_eq!(decoded.addr, "/eos/ping");
                assert_eq!(
                    decoded.args,
                    std::vec![rosc::OscType::String("hello".into())]
                );
            }
            rosc::OscPacket::Bundle(_) => panic!("expected a message"),
        }
    }
}
