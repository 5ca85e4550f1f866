//! Table-formatted output for CLI.

use colored::*;
use comfy_table::{Cell, ContentArrangement, Table};

use super::OutputFormatter;
use pusher_mock_core::device::{DeviceSet, DeviceState};
use pusher_mock_core::emulator::InboundTraffic;
use pusher_mock_core::protocol::{DiscoveryRecord, FIELD_LAYOUT};

pub struct TableOutput;

impl TableOutput {
    pub fn new() -> Self {
        Self
    }

    fn hex(bytes: &[u8]) -> String {
        bytes
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for TableOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for TableOutput {
    fn format_devices(&self, devices: &DeviceSet) -> String {
        if devices.is_empty() {
            return "No pushers configured.".to_string();
        }

        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec![
            "MAC", "Address", "Port", "Controller", "Group", "Strips", "Pixels",
        ]);

        for device in devices {
            let caps = device.capabilities();
            table.add_row(vec![
                Cell::new(device.mac()),
                Cell::new(device.identity().ip),
                Cell::new(device.port()),
                Cell::new(caps.controller_ordinal),
                Cell::new(caps.group_ordinal),
                Cell::new(caps.strips_attached),
                Cell::new(caps.pixels_per_strip),
            ]);
        }

        format!("{}\n\nEmulating {} pusher(s)", table, devices.len())
    }

    fn format_packet(&self, device: &DeviceState, decoded: &DiscoveryRecord) -> String {
        let packet = device.packet();

        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Offset", "Size", "Field", "Bytes"]);

        for spec in FIELD_LAYOUT {
            table.add_row(vec![
                Cell::new(spec.offset),
                Cell::new(spec.width),
                Cell::new(spec.name),
                Cell::new(Self::hex(packet.field(spec))),
            ]);
        }

        let caps = &decoded.capabilities;
        format!(
            "{} {} ({} bytes)\nDecodes as {}:{} controller {} group {}, {} strips of {} pixels\n{}\n{}",
            "Pusher".bold(),
            device.mac().to_string().cyan(),
            packet.len(),
            decoded.identity.ip,
            caps.my_port,
            caps.controller_ordinal,
            caps.group_ordinal,
            caps.strips_attached,
            caps.pixels_per_strip,
            table,
            packet.hex_dump().dimmed()
        )
    }

    fn format_inbound(&self, traffic: &InboundTraffic) -> String {
        format!(
            "data for pusher {} ({} bytes from {})",
            traffic.mac.to_string().cyan(),
            traffic.len,
            traffic.from
        )
    }

    fn format_message(&self, message: &str) -> String {
        message.to_string()
    }
}
