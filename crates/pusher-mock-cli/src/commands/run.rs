//! Run command: emulate pushers until interrupted.

use std::io::{self, Write};

use pusher_mock_core::{BroadcastEmulator, EmulatorOptions};

use crate::cli::RunArgs;
use crate::device::build_pushers;
use crate::error::CliError;
use crate::output::get_formatter;

/// Run the emulator
pub async fn run_emulator(args: RunArgs, json: bool) -> Result<(), CliError> {
    let formatter = get_formatter(json);

    let devices = build_pushers(&args.pushers)?;
    println!("{}", formatter.format_devices(&devices));

    let options = EmulatorOptions {
        broadcast_addr: args.broadcast_ip,
        discovery_port: args.discovery_port,
    };
    let emulator = BroadcastEmulator::new(devices, options).await?;

    if !json {
        println!("Broadcasting every second (press Ctrl+C to stop)...\n");
    }

    let on_tick = |report: &pusher_mock_core::TickReport| {
        for traffic in &report.inbound {
            println!("{}", formatter.format_inbound(traffic));
        }
        io::stdout().flush().ok();
    };

    tokio::select! {
        _ = emulator.run(on_tick) => {}
        result = tokio::signal::ctrl_c() => {
            result?;
            tracing::info!("Interrupted, releasing {} pusher(s)", emulator.devices().len());
        }
    }

    Ok(())
}
