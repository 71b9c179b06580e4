//! Economy Command Module
//!
//! Types for the economy command engine:
//! - Commands: immutable requests to mutate balances, codes, and orders
//! - Events: immutable facts broadcast after command processing
//! - Responses: plain structured results crossing the API boundary

pub mod command;
pub mod event;
pub mod types;

// Re-exports
pub use command::{CommandKind, EconomyCommand, EconomyCommandPayload};
pub use event::{EconomyEvent, EconomyEventType, EventPayload};
pub use types::{CommandError, CommandErrorCode, CommandResponse};
