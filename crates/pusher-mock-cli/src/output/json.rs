//! JSON-formatted output for CLI.
//!
//! Inbound traffic is one compact object per line (NDJSON) so the run
//! command can be piped.

use serde::Serialize;
use serde_json::json;

use super::OutputFormatter;
use pusher_mock_core::device::{DeviceSet, DeviceState};
use pusher_mock_core::emulator::InboundTraffic;
use pusher_mock_core::protocol::DiscoveryRecord;

pub struct JsonOutput;

impl JsonOutput {
    pub fn new() -> Self {
        Self
    }

    fn to_json<T: Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for JsonOutput {
    fn format_devices(&self, devices: &DeviceSet) -> String {
        let pushers: Vec<_> = devices
            .iter()
            .map(|d| {
                json!({
                    "identity": d.identity(),
                    "capabilities": d.capabilities(),
                })
            })
            .collect();

        let output = json!({
            "pushers": pushers,
            "count": devices.len()
        });
        Self::to_json(&output)
    }

    fn format_packet(&self, device: &DeviceState, decoded: &DiscoveryRecord) -> String {
        let packet = device.packet();
        let output = json!({
            "mac": device.mac(),
            "length": packet.len(),
            "hex": packet.hex_dump().replace(' ', ""),
            "identity": decoded.identity,
            "capabilities": decoded.capabilities,
        });
        Self::to_json(&output)
    }

    fn format_inbound(&self, traffic: &InboundTraffic) -> String {
        let output = json!({
            "event": "inbound",
            "mac": traffic.mac,
            "bytes": traffic.len,
            "from": traffic.from.to_string(),
        });
        output.to_string()
    }

    fn format_message(&self, message: &str) -> String {
        Self::to_json(&json!({ "message": message }))
    }
}
