//! Emulated pusher devices.

pub mod factory;
pub mod identity;
pub mod state;

pub use factory::{resolve_host_ipv4, DeviceFactory, IdentityAllocator};
pub use identity::{DeviceCapabilities, DeviceIdentity, MacAddress};
pub use state::{DeviceSet, DeviceState, Inbound, RECEIVE_BUFFER_SIZE};
