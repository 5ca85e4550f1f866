//! Discovery broadcast emulation.
//!
//! Broadcasts every pusher's discovery packet once per tick and checks
//! each pusher's private port for inbound traffic.

pub mod service;

pub use service::{
    create_broadcast_socket, BroadcastEmulator, EmulatorOptions, InboundTraffic, TickReport,
    TICK_PERIOD,
};
