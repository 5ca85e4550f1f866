//! Identity and capability descriptions advertised by a pusher.

use std::fmt;
use std::net::Ipv4Addr;

use serde::{Serialize, Serializer};

use crate::protocol::{defaults, DeviceType, STRIP_FLAG_COUNT};

/// Fixed leading bytes of every synthetic MAC address
pub const MAC_PREFIX: [u8; 5] = [0xff, 0xff, 0xff, 0xff, 0xff];

/// 6-byte hardware address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddress(pub [u8; 6]);

impl MacAddress {
    /// Build a synthetic address from the fixed prefix and a low byte.
    pub fn synthetic(low: u8) -> Self {
        let mut bytes = [0u8; 6];
        bytes[..5].copy_from_slice(&MAC_PREFIX);
        bytes[5] = low;
        Self(bytes)
    }

    pub fn octets(&self) -> [u8; 6] {
        self.0
    }

    pub fn low_byte(&self) -> u8 {
        self.0[5]
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            a, b, c, d, e, g
        )
    }
}

impl Serialize for MacAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Discovery header: who the device is and where it lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceIdentity {
    pub mac: MacAddress,
    pub ip: Ipv4Addr,
    pub device_type: DeviceType,
    /// For the device, not the discovery protocol
    pub protocol_version: u8,
    pub vendor_id: u16,
    pub product_id: u16,
    pub hw_revision: u16,
    pub sw_revision: u16,
    /// Bits per second
    pub link_speed: u32,
}

impl DeviceIdentity {
    /// Identity of an emulated PixelPusher with the stock header values.
    pub fn pixel_pusher(mac: MacAddress, ip: Ipv4Addr) -> Self {
        Self {
            mac,
            ip,
            device_type: DeviceType::PixelPusher,
            protocol_version: defaults::PROTOCOL_VERSION,
            vendor_id: defaults::VENDOR_ID,
            product_id: defaults::PRODUCT_ID,
            hw_revision: defaults::HW_REVISION,
            sw_revision: defaults::SW_REVISION,
            link_speed: defaults::LINK_SPEED,
        }
    }
}

/// PixelPusher-specific part of the discovery packet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceCapabilities {
    pub strips_attached: u8,
    pub max_strips_per_packet: u8,
    pub pixels_per_strip: u16,
    /// Microseconds
    pub update_period: u32,
    /// PWM units
    pub power_total: u32,
    /// Difference between received and expected sequence numbers
    pub delta_sequence: u32,
    pub controller_ordinal: i32,
    pub group_ordinal: i32,
    pub artnet_universe: u16,
    pub artnet_channel: u16,
    /// Private listening port of this device
    pub my_port: u16,
    pub strip_flags: [u8; STRIP_FLAG_COUNT],
    pub pusher_flags: u32,
    /// Segments in each strip
    pub segments: u32,
    pub power_domain: u32,
}
