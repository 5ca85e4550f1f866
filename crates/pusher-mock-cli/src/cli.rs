//! CLI argument definitions using clap.

use std::net::Ipv4Addr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// pusher-mock - emulate PixelPusher LED strip controllers on the local network
#[derive(Parser, Debug)]
#[command(name = "pusher-mock")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Broadcast discovery packets until interrupted
    Run(RunArgs),

    /// Print the discovery packets that would be broadcast, then exit
    Packet(PacketArgs),
}

// ==================== Pushers ====================

/// Options shared by every command that builds pushers.
#[derive(Args, Debug, Clone)]
pub struct PusherArgs {
    /// Controller number
    #[arg(short = 'n', long, default_value_t = 0, allow_negative_numbers = true)]
    pub number: i32,

    /// Controller group
    #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
    pub group: i32,

    /// Number of strips
    #[arg(short, long, default_value_t = 8)]
    pub strips: u8,

    /// Pixels per strip
    #[arg(short, long, default_value_t = 240)]
    pub pixels: u16,

    /// JSON or YAML file with a list of pusher configs
    #[arg(short = 'f', long)]
    pub config: Option<PathBuf>,

    /// Address to bind pusher listeners to (default: resolved host address)
    #[arg(long, env = "PUSHER_MOCK_BIND_IP")]
    pub bind_ip: Option<Ipv4Addr>,
}

// ==================== Run ====================

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub pushers: PusherArgs,

    /// Broadcast address for discovery packets
    #[arg(long, default_value = "255.255.255.255")]
    pub broadcast_ip: Ipv4Addr,

    /// Discovery port
    #[arg(long, default_value_t = pusher_mock_core::DISCOVERY_PORT)]
    pub discovery_port: u16,
}

// ==================== Packet ====================

#[derive(Args, Debug)]
pub struct PacketArgs {
    #[command(flatten)]
    pub pushers: PusherArgs,
}
