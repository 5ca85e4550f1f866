//! Error types for the pusher-mock CLI.
//!
//! CliError wraps CoreError from the shared library and maps it to exit codes.

use pusher_mock_core::error::CoreError;
use thiserror::Error;

pub use pusher_mock_core::error::{ConfigError, DeviceError, PacketError};

/// Exit codes for the CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const NETWORK_ERROR: i32 = 2;
    pub const CONFIG_ERROR: i32 = 3;
}

/// Main error type for the CLI
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Core(#[from] CoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Core(e) => match e {
                CoreError::Config(_) => exit_codes::CONFIG_ERROR,
                CoreError::Device(DeviceError::Bind { .. })
                | CoreError::Device(DeviceError::Hostname(_))
                | CoreError::Device(DeviceError::HostLookup { .. })
                | CoreError::Device(DeviceError::HostResolution(_)) => exit_codes::NETWORK_ERROR,
                CoreError::Device(_) => exit_codes::GENERAL_ERROR,
                CoreError::Packet(_) => exit_codes::GENERAL_ERROR,
            },
            CliError::Io(_) => exit_codes::NETWORK_ERROR,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Core(CoreError::Config(e))
    }
}

impl From<DeviceError> for CliError {
    fn from(e: DeviceError) -> Self {
        CliError::Core(CoreError::Device(e))
    }
}

impl From<PacketError> for CliError {
    fn from(e: PacketError) -> Self {
        CliError::Core(CoreError::Packet(e))
    }
}
