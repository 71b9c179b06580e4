//! Core module - configuration and process-wide state wiring

pub mod config;
pub mod state;

pub use config::Config;
pub use state::ServerState;
