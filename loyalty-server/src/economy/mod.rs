//! Economy Engine Module
//!
//! Command-handling core enforcing atomicity, idempotency, and policy
//! checks across scans, claims, redemptions, and registrations.
//!
//! - **actions**: one handler per command type, enum-dispatched
//! - **policy**: pure authorization predicates gated before handlers
//! - **context**: read-only per-command state snapshot
//! - **service**: the dispatch façade (gate → handler → tx → broadcast)
//! - **events**: in-process best-effort event bus

pub mod actions;
pub mod context;
pub mod error;
pub mod events;
pub mod policy;
pub mod service;
pub mod traits;

// Re-exports
pub use context::{ContextBuilderService, EvalContext, UserSnapshot};
pub use error::EconomyError;
pub use events::EventBus;
pub use policy::{Policy, PolicyGate};
pub use service::EconomyService;
pub use traits::{CommandContext, CommandHandler, CommandMeta};
