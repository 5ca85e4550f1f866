//! Command implementations.

pub mod packet;
pub mod run;

pub use packet::run_packet;
pub use run::run_emulator;
