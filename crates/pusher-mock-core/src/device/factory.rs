//! Pusher construction.
//!
//! The [`IdentityAllocator`] hands out MAC low bytes and listener ports
//! during startup. It lives inside the [`DeviceFactory`] and is dropped
//! with it once the [`DeviceSet`] is built.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, ToSocketAddrs, UdpSocket};

use socket2::{Domain, Protocol, Socket, Type};

use super::identity::{DeviceCapabilities, DeviceIdentity, MacAddress};
use super::state::{DeviceSet, DeviceState};
use crate::config::PusherSettings;
use crate::error::DeviceError;

/// First synthetic MAC low byte
pub const FIRST_MAC_LOW_BYTE: u8 = 1;

/// First private listener port
pub const FIRST_LISTEN_PORT: u16 = 64203;

/// Startup-time source of unique MAC low bytes and ports.
///
/// Both counters only move forward and never wrap.
#[derive(Debug, Clone)]
pub struct IdentityAllocator {
    next_mac: u16,
    next_port: u32,
}

impl IdentityAllocator {
    pub fn new(first_mac: u8, first_port: u16) -> Self {
        Self {
            next_mac: first_mac as u16,
            next_port: first_port as u32,
        }
    }

    /// Take the next MAC address and port.
    pub fn allocate(&mut self) -> Result<(MacAddress, u16), DeviceError> {
        let mac = u8::try_from(self.next_mac).map_err(|_| DeviceError::MacExhausted)?;
        let port = u16::try_from(self.next_port).map_err(|_| DeviceError::PortExhausted)?;

        self.next_mac += 1;
        self.next_port += 1;

        Ok((MacAddress::synthetic(mac), port))
    }
}

impl Default for IdentityAllocator {
    fn default() -> Self {
        Self::new(FIRST_MAC_LOW_BYTE, FIRST_LISTEN_PORT)
    }
}

/// Builds pushers bound to one host address.
pub struct DeviceFactory {
    allocator: IdentityAllocator,
    host_ip: Ipv4Addr,
}

impl DeviceFactory {
    pub fn new(host_ip: Ipv4Addr) -> Self {
        Self::with_allocator(host_ip, IdentityAllocator::default())
    }

    pub fn with_allocator(host_ip: Ipv4Addr, allocator: IdentityAllocator) -> Self {
        Self { allocator, host_ip }
    }

    /// Create one pusher and bind its private listener.
    pub fn create_device(&mut self, settings: &PusherSettings) -> Result<DeviceState, DeviceError> {
        let (mac, port) = self.allocator.allocate()?;
        let addr = SocketAddrV4::new(self.host_ip, port);

        let listener = bind_listener(addr).map_err(|source| DeviceError::Bind {
            addr: SocketAddr::V4(addr),
            source,
        })?;

        let identity = DeviceIdentity::pixel_pusher(mac, self.host_ip);
        let capabilities = capabilities_for(settings, port);

        tracing::info!(
            %mac,
            port,
            controller = capabilities.controller_ordinal,
            group = capabilities.group_ordinal,
            "Created pusher with {} strips of {} pixels",
            capabilities.strips_attached,
            capabilities.pixels_per_strip
        );

        Ok(DeviceState::new(identity, capabilities, listener))
    }

    /// Create every pusher, in order. Any failure aborts the whole set.
    pub fn build_device_set(mut self, settings: &[PusherSettings]) -> Result<DeviceSet, DeviceError> {
        let devices = settings
            .iter()
            .map(|s| self.create_device(s))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DeviceSet::new(devices))
    }
}

fn capabilities_for(settings: &PusherSettings, port: u16) -> DeviceCapabilities {
    DeviceCapabilities {
        strips_attached: settings.strips_attached,
        max_strips_per_packet: settings.max_strips_per_packet,
        pixels_per_strip: settings.pixels_per_strip,
        update_period: settings.update_period,
        power_total: settings.power_total,
        delta_sequence: 0,
        controller_ordinal: settings.controller_ordinal,
        group_ordinal: settings.group_ordinal,
        artnet_universe: 0,
        artnet_channel: 0,
        my_port: port,
        strip_flags: settings.strip_flags,
        pusher_flags: settings.pusher_flags,
        segments: settings.segments,
        power_domain: settings.power_domain,
    }
}

/// Bind a non-blocking UDP listener. No address reuse: a port already
/// in use must fail.
fn bind_listener(addr: SocketAddrV4) -> Result<UdpSocket, std::io::Error> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;

    socket.set_nonblocking(true)?;
    socket.bind(&SocketAddr::V4(addr).into())?;

    Ok(socket.into())
}

/// Resolve this machine's hostname to an IPv4 address.
pub fn resolve_host_ipv4() -> Result<Ipv4Addr, DeviceError> {
    let name = hostname::get().map_err(DeviceError::Hostname)?;
    let name = name
        .into_string()
        .map_err(|_| DeviceError::HostResolution("hostname is not valid UTF-8".to_string()))?;

    let addrs = (name.as_str(), 0)
        .to_socket_addrs()
        .map_err(|source| DeviceError::HostLookup {
            host: name.clone(),
            source,
        })?;

    addrs
        .filter_map(|addr| match addr {
            SocketAddr::V4(v4) => Some(*v4.ip()),
            SocketAddr::V6(_) => None,
        })
        .next()
        .ok_or_else(|| DeviceError::HostResolution(format!("{} has no IPv4 address", name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A port base that is free right now, with room for a few devices.
    fn free_port_base() -> u16 {
        let scratch = UdpSocket::bind("127.0.0.1:0").unwrap();
        let port = scratch.local_addr().unwrap().port();
        port.min(u16::MAX - 16)
    }

    fn loopback_factory() -> DeviceFactory {
        DeviceFactory::with_allocator(
            Ipv4Addr::LOCALHOST,
            IdentityAllocator::new(FIRST_MAC_LOW_BYTE, free_port_base()),
        )
    }

    #[test]
    fn test_allocator_starts_at_defaults() {
        let mut allocator = IdentityAllocator::default();
        let (mac, port) = allocator.allocate().unwrap();
        assert_eq!(mac, MacAddress::synthetic(1));
        assert_eq!(port, 64203);

        let (mac, port) = allocator.allocate().unwrap();
        assert_eq!(mac.low_byte(), 2);
        assert_eq!(port, 64204);
    }

    #[test]
    fn test_allocator_is_strictly_increasing() {
        let mut allocator = IdentityAllocator::new(1, 1000);
        let allocated: Vec<_> = (0..100).map(|_| allocator.allocate().unwrap()).collect();

        for pair in allocated.windows(2) {
            assert!(pair[1].0.low_byte() > pair[0].0.low_byte());
            assert!(pair[1].1 > pair[0].1);
        }
    }

    #[test]
    fn test_allocator_mac_exhaustion() {
        let mut allocator = IdentityAllocator::new(255, 1000);
        assert_eq!(allocator.allocate().unwrap().0.low_byte(), 255);
        assert!(matches!(allocator.allocate(), Err(DeviceError::MacExhausted)));
    }

    #[test]
    fn test_allocator_port_exhaustion() {
        let mut allocator = IdentityAllocator::new(1, u16::MAX);
        assert_eq!(allocator.allocate().unwrap().1, u16::MAX);
        assert!(matches!(allocator.allocate(), Err(DeviceError::PortExhausted)));
    }

    #[test]
    fn test_create_device_defaults() {
        let mut factory = loopback_factory();
        let device = factory.create_device(&PusherSettings::default()).unwrap();

        let caps = device.capabilities();
        assert_eq!(caps.strips_attached, 8);
        assert_eq!(caps.pixels_per_strip, 240);
        assert_eq!(caps.controller_ordinal, 0);
        assert_eq!(caps.group_ordinal, 0);
        assert_eq!(caps.artnet_universe, 0);
        assert_eq!(caps.artnet_channel, 0);
        assert_eq!(device.identity().ip, Ipv4Addr::LOCALHOST);
        assert_eq!(device.local_addr().unwrap().port(), device.port());
    }

    #[test]
    fn test_devices_get_distinct_identities() {
        let mut factory = loopback_factory();
        let devices: Vec<_> = (0..4)
            .map(|_| factory.create_device(&PusherSettings::default()).unwrap())
            .collect();

        for pair in devices.windows(2) {
            assert_eq!(pair[1].mac().low_byte(), pair[0].mac().low_byte() + 1);
            assert_eq!(pair[1].port(), pair[0].port() + 1);
            assert_ne!(pair[0].packet(), pair[1].packet());
        }
    }

    #[test]
    fn test_bind_collision_is_an_error() {
        let occupied = UdpSocket::bind("127.0.0.1:0").unwrap();
        let port = occupied.local_addr().unwrap().port();

        let mut factory =
            DeviceFactory::with_allocator(Ipv4Addr::LOCALHOST, IdentityAllocator::new(1, port));
        match factory.create_device(&PusherSettings::default()) {
            Err(DeviceError::Bind { addr, .. }) => assert_eq!(addr.port(), port),
            other => panic!("expected bind error, got {:?}", other.map(|d| d.mac())),
        }
    }

    #[test]
    fn test_build_device_set_is_all_or_nothing() {
        let occupied = UdpSocket::bind("127.0.0.1:0").unwrap();
        let port = occupied.local_addr().unwrap().port();

        // Second device lands on the occupied port
        let factory = DeviceFactory::with_allocator(
            Ipv4Addr::LOCALHOST,
            IdentityAllocator::new(1, port - 1),
        );
        let settings = vec![PusherSettings::default(), PusherSettings::default()];
        assert!(factory.build_device_set(&settings).is_err());
    }

    #[test]
    fn test_build_device_set_keeps_order() {
        let settings: Vec<_> = (0..3)
            .map(|n| PusherSettings {
                controller_ordinal: n,
                ..Default::default()
            })
            .collect();

        let set = loopback_factory().build_device_set(&settings).unwrap();
        assert_eq!(set.len(), 3);
        let ordinals: Vec<_> = set.iter().map(|d| d.capabilities().controller_ordinal).collect();
        assert_eq!(ordinals, vec![0, 1, 2]);
    }
}
