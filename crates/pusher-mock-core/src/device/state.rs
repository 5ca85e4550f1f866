//! Runtime state of one emulated pusher.

use std::io;
use std::net::{SocketAddr, UdpSocket};

use super::identity::{DeviceCapabilities, DeviceIdentity, MacAddress};
use crate::protocol::DiscoveryPacket;

/// Bounded read size for inbound traffic
pub const RECEIVE_BUFFER_SIZE: usize = 1500;

/// A datagram that arrived on a pusher's private port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inbound {
    pub len: usize,
    pub from: SocketAddr,
}

/// One emulated pusher.
///
/// The discovery packet is encoded once here and reused for every
/// broadcast. The listener is non-blocking and owned for the life of
/// the device.
#[derive(Debug)]
pub struct DeviceState {
    identity: DeviceIdentity,
    capabilities: DeviceCapabilities,
    packet: DiscoveryPacket,
    listener: UdpSocket,
}

impl DeviceState {
    pub fn new(
        identity: DeviceIdentity,
        capabilities: DeviceCapabilities,
        listener: UdpSocket,
    ) -> Self {
        let packet = DiscoveryPacket::encode(&identity, &capabilities);
        Self {
            identity,
            capabilities,
            packet,
            listener,
        }
    }

    pub fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }

    pub fn capabilities(&self) -> &DeviceCapabilities {
        &self.capabilities
    }

    pub fn packet(&self) -> &DiscoveryPacket {
        &self.packet
    }

    pub fn mac(&self) -> MacAddress {
        self.identity.mac
    }

    pub fn port(&self) -> u16 {
        self.capabilities.my_port
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Non-blocking check for inbound traffic.
    ///
    /// `Ok(None)` when nothing is pending. Any error other than
    /// would-block is returned to the caller.
    pub fn poll_inbound(&self, buf: &mut [u8]) -> io::Result<Option<Inbound>> {
        match self.listener.recv_from(buf) {
            Ok((len, from)) => Ok(Some(Inbound { len, from })),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Every pusher of one emulator run, in creation order.
#[derive(Debug, Default)]
pub struct DeviceSet {
    devices: Vec<DeviceState>,
}

impl DeviceSet {
    pub fn new(devices: Vec<DeviceState>) -> Self {
        Self { devices }
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DeviceState> {
        self.devices.iter()
    }

    pub fn as_slice(&self) -> &[DeviceState] {
        &self.devices
    }
}

impl<'a> IntoIterator for &'a DeviceSet {
    type Item = &'a DeviceState;
    type IntoIter = std::slice::Iter<'a, DeviceState>;

    fn into_iter(self) -> Self::IntoIter {
        self.devices.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::identity::DeviceIdentity;
    use std::net::Ipv4Addr;

    fn make_device() -> DeviceState {
        let listener = UdpSocket::bind("127.0.0.1:0").unwrap();
        listener.set_nonblocking(true).unwrap();
        let port = listener.local_addr().unwrap().port();

        let identity = DeviceIdentity::pixel_pusher(MacAddress::synthetic(1), Ipv4Addr::LOCALHOST);
        let capabilities = DeviceCapabilities {
            strips_attached: 8,
            max_strips_per_packet: 2,
            pixels_per_strip: 240,
            update_period: 3_000_000,
            power_total: 12_000,
            delta_sequence: 0,
            controller_ordinal: 0,
            group_ordinal: 0,
            artnet_universe: 0,
            artnet_channel: 0,
            my_port: port,
            strip_flags: [0; 8],
            pusher_flags: 0,
            segments: 0,
            power_domain: 0,
        };
        DeviceState::new(identity, capabilities, listener)
    }

    #[test]
    fn test_packet_is_precomputed() {
        let device = make_device();
        let expected = DiscoveryPacket::encode(device.identity(), device.capabilities());
        assert_eq!(device.packet(), &expected);
    }

    #[test]
    fn test_poll_without_data_returns_none() {
        let device = make_device();
        let mut buf = [0u8; RECEIVE_BUFFER_SIZE];
        assert_eq!(device.poll_inbound(&mut buf).unwrap(), None);
    }

    #[test]
    fn test_poll_reports_datagram() {
        let device = make_device();
        let sender = UdpSocket::bind("127.0.0.1:0").unwrap();
        sender.send_to(b"pixels", device.local_addr().unwrap()).unwrap();

        let mut buf = [0u8; RECEIVE_BUFFER_SIZE];
        let mut inbound = None;
        for _ in 0..50 {
            inbound = device.poll_inbound(&mut buf).unwrap();
            if inbound.is_some() {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
        }

        let inbound = inbound.expect("datagram should arrive on loopback");
        assert_eq!(inbound.len, 6);
        assert_eq!(inbound.from, sender.local_addr().unwrap());
        assert_eq!(&buf[..inbound.len], b"pixels");
    }
}
