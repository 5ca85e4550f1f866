//! Discovery packet codec.
//!
//! A discovery packet is a device header followed by the PixelPusher
//! body. Multi-byte integers are little-endian; the MAC and IP address
//! are raw octets in network order.
//!
//! ```text
//! offset  size  field
//!      0     6  mac address
//!      6     4  ip address
//!     10     1  device type
//!     11     1  protocol version
//!     12     2  vendor id
//!     14     2  product id
//!     16     2  hw revision
//!     18     2  sw revision
//!     20     4  link speed (bit/s)
//!     24     1  strips attached
//!     25     1  max strips per packet
//!     26     2  pixels per strip
//!     28     4  update period (us)
//!     32     4  power total (PWM units)
//!     36     4  delta sequence
//!     40     4  controller ordinal (signed)
//!     44     4  group ordinal (signed)
//!     48     2  artnet universe
//!     50     2  artnet channel
//!     52     2  listening port
//!     54    10  strip flags (8 flags + 2 zero bytes)
//!     64     4  pusher flags
//!     68     4  segments
//!     72     4  power domain
//! ```

use std::net::Ipv4Addr;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::{DeviceType, STRIP_FLAG_COUNT, STRIP_FLAG_PADDING};
use crate::device::{DeviceCapabilities, DeviceIdentity, MacAddress};
use crate::error::PacketError;

/// Length of the device header
pub const HEADER_LEN: usize = 24;

/// Length of the PixelPusher body
pub const BODY_LEN: usize = 52;

/// Total length of an encoded discovery packet
pub const DISCOVERY_PACKET_LEN: usize = HEADER_LEN + BODY_LEN;

/// Position and width of one wire field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub offset: usize,
    pub width: usize,
}

const fn field(name: &'static str, offset: usize, width: usize) -> FieldSpec {
    FieldSpec {
        name,
        offset,
        width,
    }
}

/// Every field of the packet in wire order.
pub const FIELD_LAYOUT: &[FieldSpec] = &[
    field("mac_address", 0, 6),
    field("ip_address", 6, 4),
    field("device_type", 10, 1),
    field("protocol_version", 11, 1),
    field("vendor_id", 12, 2),
    field("product_id", 14, 2),
    field("hw_revision", 16, 2),
    field("sw_revision", 18, 2),
    field("link_speed", 20, 4),
    field("strips_attached", 24, 1),
    field("max_strips_per_packet", 25, 1),
    field("pixels_per_strip", 26, 2),
    field("update_period", 28, 4),
    field("power_total", 32, 4),
    field("delta_sequence", 36, 4),
    field("controller_ordinal", 40, 4),
    field("group_ordinal", 44, 4),
    field("artnet_universe", 48, 2),
    field("artnet_channel", 50, 2),
    field("my_port", 52, 2),
    field("strip_flags", 54, STRIP_FLAG_COUNT + STRIP_FLAG_PADDING),
    field("pusher_flags", 64, 4),
    field("segments", 68, 4),
    field("power_domain", 72, 4),
];

/// Encoded, immutable discovery packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryPacket(Bytes);

impl DiscoveryPacket {
    /// Encode identity and capabilities into the wire layout.
    pub fn encode(identity: &DeviceIdentity, caps: &DeviceCapabilities) -> Self {
        let mut buf = BytesMut::with_capacity(DISCOVERY_PACKET_LEN);

        buf.put_slice(&identity.mac.octets());
        buf.put_slice(&identity.ip.octets());
        buf.put_u8(identity.device_type.as_u8());
        buf.put_u8(identity.protocol_version);
        buf.put_u16_le(identity.vendor_id);
        buf.put_u16_le(identity.product_id);
        buf.put_u16_le(identity.hw_revision);
        buf.put_u16_le(identity.sw_revision);
        buf.put_u32_le(identity.link_speed);

        buf.put_u8(caps.strips_attached);
        buf.put_u8(caps.max_strips_per_packet);
        buf.put_u16_le(caps.pixels_per_strip);
        buf.put_u32_le(caps.update_period);
        buf.put_u32_le(caps.power_total);
        buf.put_u32_le(caps.delta_sequence);
        buf.put_i32_le(caps.controller_ordinal);
        buf.put_i32_le(caps.group_ordinal);
        buf.put_u16_le(caps.artnet_universe);
        buf.put_u16_le(caps.artnet_channel);
        buf.put_u16_le(caps.my_port);
        buf.put_slice(&caps.strip_flags);
        buf.put_bytes(0, STRIP_FLAG_PADDING);
        buf.put_u32_le(caps.pusher_flags);
        buf.put_u32_le(caps.segments);
        buf.put_u32_le(caps.power_domain);

        debug_assert_eq!(buf.len(), DISCOVERY_PACKET_LEN);
        Self(buf.freeze())
    }

    /// Decode a packet the way a discovery client would.
    ///
    /// Trailing bytes beyond the fixed layout are ignored.
    pub fn parse(data: &[u8]) -> Result<DiscoveryRecord, PacketError> {
        if data.len() < DISCOVERY_PACKET_LEN {
            return Err(PacketError::TooShort { len: data.len() });
        }

        let mut buf = data;

        let mut mac = [0u8; 6];
        buf.copy_to_slice(&mut mac);
        let mut ip = [0u8; 4];
        buf.copy_to_slice(&mut ip);
        let raw_type = buf.get_u8();
        let device_type =
            DeviceType::from_u8(raw_type).ok_or(PacketError::UnknownDeviceType(raw_type))?;

        let identity = DeviceIdentity {
            mac: MacAddress(mac),
            ip: Ipv4Addr::from(ip),
            device_type,
            protocol_version: buf.get_u8(),
            vendor_id: buf.get_u16_le(),
            product_id: buf.get_u16_le(),
            hw_revision: buf.get_u16_le(),
            sw_revision: buf.get_u16_le(),
            link_speed: buf.get_u32_le(),
        };

        let strips_attached = buf.get_u8();
        let max_strips_per_packet = buf.get_u8();
        let pixels_per_strip = buf.get_u16_le();
        let update_period = buf.get_u32_le();
        let power_total = buf.get_u32_le();
        let delta_sequence = buf.get_u32_le();
        let controller_ordinal = buf.get_i32_le();
        let group_ordinal = buf.get_i32_le();
        let artnet_universe = buf.get_u16_le();
        let artnet_channel = buf.get_u16_le();
        let my_port = buf.get_u16_le();
        let mut strip_flags = [0u8; STRIP_FLAG_COUNT];
        buf.copy_to_slice(&mut strip_flags);
        buf.advance(STRIP_FLAG_PADDING);

        let capabilities = DeviceCapabilities {
            strips_attached,
            max_strips_per_packet,
            pixels_per_strip,
            update_period,
            power_total,
            delta_sequence,
            controller_ordinal,
            group_ordinal,
            artnet_universe,
            artnet_channel,
            my_port,
            strip_flags,
            pusher_flags: buf.get_u32_le(),
            segments: buf.get_u32_le(),
            power_domain: buf.get_u32_le(),
        };

        Ok(DiscoveryRecord {
            identity,
            capabilities,
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw bytes of one field.
    pub fn field(&self, spec: &FieldSpec) -> &[u8] {
        &self.0[spec.offset..spec.offset + spec.width]
    }

    /// Hex dump, eight bytes per group.
    pub fn hex_dump(&self) -> String {
        self.0
            .chunks(8)
            .map(|chunk| chunk.iter().map(|b| format!("{:02x}", b)).collect::<String>())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Decoded contents of a discovery packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryRecord {
    pub identity: DeviceIdentity,
    pub capabilities: DeviceCapabilities,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_identity() -> DeviceIdentity {
        DeviceIdentity {
            mac: MacAddress([0xff, 0xff, 0xff, 0xff, 0xff, 0x01]),
            ip: Ipv4Addr::new(192, 168, 1, 42),
            device_type: DeviceType::PixelPusher,
            protocol_version: 2,
            vendor_id: 0x000c,
            product_id: 0x0002,
            hw_revision: 0x0004,
            sw_revision: 0x0079,
            link_speed: 100_000_000,
        }
    }

    fn sample_capabilities() -> DeviceCapabilities {
        DeviceCapabilities {
            strips_attached: 8,
            max_strips_per_packet: 2,
            pixels_per_strip: 0x0102,
            update_period: 3_000_000,
            power_total: 12_000,
            delta_sequence: 0x0a0b0c0d,
            controller_ordinal: -2,
            group_ordinal: 0x01020304,
            artnet_universe: 0x1122,
            artnet_channel: 0x3344,
            my_port: 64203,
            strip_flags: [1, 2, 3, 4, 5, 6, 7, 8],
            pusher_flags: 0xdeadbeef,
            segments: 3,
            power_domain: 0x00ff00ff,
        }
    }

    fn sample_packet() -> DiscoveryPacket {
        DiscoveryPacket::encode(&sample_identity(), &sample_capabilities())
    }

    #[test]
    fn test_encoded_length() {
        assert_eq!(DISCOVERY_PACKET_LEN, 76);
        assert_eq!(sample_packet().len(), DISCOVERY_PACKET_LEN);
    }

    #[test]
    fn test_encoding_is_deterministic() {
        assert_eq!(sample_packet().as_bytes(), sample_packet().as_bytes());
    }

    #[test]
    fn test_field_layout_is_contiguous() {
        let mut expected_offset = 0;
        for spec in FIELD_LAYOUT {
            assert_eq!(spec.offset, expected_offset, "field {}", spec.name);
            expected_offset += spec.width;
        }
        assert_eq!(expected_offset, DISCOVERY_PACKET_LEN);
    }

    #[test]
    fn test_field_offsets() {
        let packet = sample_packet();
        let expected: &[(&str, &[u8])] = &[
            ("mac_address", &[0xff, 0xff, 0xff, 0xff, 0xff, 0x01]),
            ("ip_address", &[192, 168, 1, 42]),
            ("device_type", &[2]),
            ("protocol_version", &[2]),
            ("vendor_id", &[0x0c, 0x00]),
            ("product_id", &[0x02, 0x00]),
            ("hw_revision", &[0x04, 0x00]),
            ("sw_revision", &[0x79, 0x00]),
            ("link_speed", &[0x00, 0xe1, 0xf5, 0x05]),
            ("strips_attached", &[8]),
            ("max_strips_per_packet", &[2]),
            ("pixels_per_strip", &[0x02, 0x01]),
            ("update_period", &[0xc0, 0xc6, 0x2d, 0x00]),
            ("power_total", &[0xe0, 0x2e, 0x00, 0x00]),
            ("delta_sequence", &[0x0d, 0x0c, 0x0b, 0x0a]),
            ("controller_ordinal", &[0xfe, 0xff, 0xff, 0xff]),
            ("group_ordinal", &[0x04, 0x03, 0x02, 0x01]),
            ("artnet_universe", &[0x22, 0x11]),
            ("artnet_channel", &[0x44, 0x33]),
            ("my_port", &[0xcb, 0xfa]),
            ("strip_flags", &[1, 2, 3, 4, 5, 6, 7, 8, 0, 0]),
            ("pusher_flags", &[0xef, 0xbe, 0xad, 0xde]),
            ("segments", &[3, 0, 0, 0]),
            ("power_domain", &[0xff, 0x00, 0xff, 0x00]),
        ];

        assert_eq!(expected.len(), FIELD_LAYOUT.len());
        for ((name, bytes), spec) in expected.iter().zip(FIELD_LAYOUT) {
            assert_eq!(*name, spec.name);
            assert_eq!(packet.field(spec), *bytes, "field {}", spec.name);
        }
    }

    #[test]
    fn test_parse_recovers_fields() {
        let record = DiscoveryPacket::parse(sample_packet().as_bytes()).unwrap();
        assert_eq!(record.identity, sample_identity());
        assert_eq!(record.capabilities, sample_capabilities());
    }

    #[test]
    fn test_parse_ignores_trailing_bytes() {
        let mut data = sample_packet().as_bytes().to_vec();
        data.extend_from_slice(&[9, 9, 9, 9]);
        let record = DiscoveryPacket::parse(&data).unwrap();
        assert_eq!(record.capabilities.power_domain, 0x00ff00ff);
    }

    #[test]
    fn test_parse_too_short() {
        let data = sample_packet().as_bytes()[..40].to_vec();
        assert_eq!(
            DiscoveryPacket::parse(&data),
            Err(PacketError::TooShort { len: 40 })
        );
    }

    #[test]
    fn test_parse_unknown_device_type() {
        let mut data = sample_packet().as_bytes().to_vec();
        data[10] = 9;
        assert_eq!(
            DiscoveryPacket::parse(&data),
            Err(PacketError::UnknownDeviceType(9))
        );
    }

    #[test]
    fn test_hex_dump_groups() {
        let dump = sample_packet().hex_dump();
        assert!(dump.starts_with("ffffffffff01c0a8 "));
        assert_eq!(dump.split(' ').count(), 10);
    }
}
