//! Error types for the pusher emulator core.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use crate::device::MacAddress;

/// Core error type for shared operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Device error: {0}")]
    Device(#[from] DeviceError),

    #[error("Packet error: {0}")]
    Packet(#[from] PacketError),
}

/// Configuration errors. Always fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid config file: expected a list of pusher records")]
    NotAList,

    #[error("Invalid pusher record #{index}: {message}")]
    InvalidRecord { index: usize, message: String },

    #[error("No pushers configured")]
    Empty,
}

/// Device construction errors. Always fatal at startup.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("Failed to bind pusher listener on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Ran out of synthetic MAC addresses")]
    MacExhausted,

    #[error("Ran out of listener ports")]
    PortExhausted,

    #[error("Failed to read this host's name: {0}")]
    Hostname(#[source] std::io::Error),

    #[error("Failed to resolve host {host}: {source}")]
    HostLookup {
        host: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not resolve an IPv4 address for this host: {0}")]
    HostResolution(String),
}

/// Discovery packet decoding errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PacketError {
    #[error("Discovery packet too short: {len} bytes")]
    TooShort { len: usize },

    #[error("Unknown device type: {0}")]
    UnknownDeviceType(u8),
}

/// Steady-state network failures inside the broadcast loop.
///
/// These are reported per tick and never stop the emulator.
#[derive(Debug, Error)]
pub enum TransientNetworkError {
    #[error("Broadcast for pusher {mac} failed: {source}")]
    Send {
        mac: MacAddress,
        #[source]
        source: std::io::Error,
    },

    #[error("Receive on pusher {mac} failed: {source}")]
    Receive {
        mac: MacAddress,
        #[source]
        source: std::io::Error,
    },
}
