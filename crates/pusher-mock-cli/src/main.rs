//! pusher-mock - emulate PixelPusher LED strip controllers.
//!
//! Broadcasts PixelPusher discovery packets for one or more simulated
//! devices so discovery clients can be tested without hardware.

mod cli;
mod commands;
mod device;
mod error;
mod logging;
mod output;

use clap::Parser;

use cli::{Cli, Commands};
use error::{exit_codes, CliError};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    logging::init(cli.verbose);

    let result = run(cli).await;

    match result {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Run(args) => commands::run_emulator(args, cli.json).await,
        Commands::Packet(args) => commands::run_packet(args, cli.json),
    }
}
