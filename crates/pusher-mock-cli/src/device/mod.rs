//! Pusher construction for CLI commands.

pub mod pushers;

pub use pushers::build_pushers;
