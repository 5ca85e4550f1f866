//! Output formatting for CLI results.

pub mod json;
pub mod table;

pub use json::JsonOutput;
pub use table::TableOutput;

use pusher_mock_core::device::{DeviceSet, DeviceState};
use pusher_mock_core::emulator::InboundTraffic;
use pusher_mock_core::protocol::DiscoveryRecord;

/// Output formatter trait
pub trait OutputFormatter {
    /// Format the emulated pusher list
    fn format_devices(&self, devices: &DeviceSet) -> String;

    /// Format one pusher's discovery packet and what a client decodes from it
    fn format_packet(&self, device: &DeviceState, decoded: &DiscoveryRecord) -> String;

    /// Format a datagram received by a pusher
    fn format_inbound(&self, traffic: &InboundTraffic) -> String;

    /// Format a generic message
    fn format_message(&self, message: &str) -> String;
}

/// Get the appropriate formatter based on JSON flag
pub fn get_formatter(json: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonOutput::new())
    } else {
        Box::new(TableOutput::new())
    }
}
