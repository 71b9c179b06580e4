//! Shared types for the loyalty backend
//!
//! Common types used across crates: domain models, economy commands,
//! events, command responses, and utility functions.

pub mod economy;
pub mod models;
pub mod util;

// Re-exports
pub use economy::{CommandError, CommandErrorCode, CommandResponse, EconomyCommand};
pub use serde::{Deserialize, Serialize};
