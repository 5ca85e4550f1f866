//! Core of the PixelPusher emulator.
//!
//! Builds simulated LED strip controllers from configuration, encodes
//! their discovery packets, and broadcasts them on the local network.

pub mod config;
pub mod device;
pub mod emulator;
pub mod error;
pub mod protocol;

pub use config::{DeviceConfig, PusherSettings};
pub use device::{DeviceFactory, DeviceSet, DeviceState};
pub use emulator::{BroadcastEmulator, EmulatorOptions, TickReport};
pub use error::{ConfigError, CoreError, DeviceError, PacketError, TransientNetworkError};
pub use protocol::{DiscoveryPacket, DISCOVERY_PACKET_LEN, DISCOVERY_PORT};
