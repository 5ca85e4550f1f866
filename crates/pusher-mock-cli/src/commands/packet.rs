//! Packet command: show the discovery packets without broadcasting.

use pusher_mock_core::protocol::{DiscoveryPacket, DiscoveryRecord};
use pusher_mock_core::DeviceState;

use crate::cli::PacketArgs;
use crate::device::build_pushers;
use crate::error::CliError;
use crate::output::get_formatter;

/// Print every pusher's discovery packet
pub fn run_packet(args: PacketArgs, json: bool) -> Result<(), CliError> {
    let formatter = get_formatter(json);

    let devices = build_pushers(&args.pushers)?;

    for device in &devices {
        let decoded = decode_advertised(device)?;
        println!("{}", formatter.format_packet(device, &decoded));
    }

    if !json {
        println!(
            "{}",
            formatter.format_message(&format!("{} packet(s) encoded", devices.len()))
        );
    }

    Ok(())
}

/// Decode a pusher's cached packet the way a discovery client would.
fn decode_advertised(device: &DeviceState) -> Result<DiscoveryRecord, CliError> {
    Ok(DiscoveryPacket::parse(device.packet().as_bytes())?)
}
