//! PixelPusher discovery protocol.
//!
//! Constants shared by every device on the discovery network, plus the
//! fixed-layout discovery packet codec in [`discovery`].

pub mod discovery;

pub use discovery::{DiscoveryPacket, DiscoveryRecord, FieldSpec, DISCOVERY_PACKET_LEN, FIELD_LAYOUT};

use serde::{Deserialize, Serialize};

/// UDP port that discovery packets are broadcast to
pub const DISCOVERY_PORT: u16 = 7331;

/// Number of strip flag bytes carried in the packet
pub const STRIP_FLAG_COUNT: usize = 8;

/// Zero padding after the strip flags
pub const STRIP_FLAG_PADDING: usize = 2;

/// Device type tag in the discovery header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeviceType {
    EtherDream,
    LumiaBridge,
    PixelPusher,
}

impl DeviceType {
    pub fn as_u8(self) -> u8 {
        match self {
            DeviceType::EtherDream => 0,
            DeviceType::LumiaBridge => 1,
            DeviceType::PixelPusher => 2,
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(DeviceType::EtherDream),
            1 => Some(DeviceType::LumiaBridge),
            2 => Some(DeviceType::PixelPusher),
            _ => None,
        }
    }
}

/// Header values advertised by every emulated pusher.
pub mod defaults {
    pub const PROTOCOL_VERSION: u8 = 2;
    pub const VENDOR_ID: u16 = 12;
    pub const PRODUCT_ID: u16 = 2;
    pub const HW_REVISION: u16 = 4;
    pub const SW_REVISION: u16 = 121;
    /// 100 Mbit/s
    pub const LINK_SPEED: u32 = 100_000_000;

    pub const MAX_STRIPS_PER_PACKET: u8 = 2;
    /// Microseconds
    pub const UPDATE_PERIOD: u32 = 3_000_000;
    /// PWM units
    pub const POWER_TOTAL: u32 = 12_000;
}
