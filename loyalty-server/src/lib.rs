//! Loyalty economy engine
//!
//! Command-handling core for a loyalty/rewards backend: users scan
//! product codes, accrue points, redeem rewards, and earn achievements.
//!
//! # Architecture
//!
//! ```text
//! Command → EconomyService → PolicyGate → CommandAction → SQLite (tx)
//!                 ↓                                            ↓
//!             Broadcast                                 Ledger Append
//!                 ↓
//!        Workers (gamification, ...)
//! ```
//!
//! # Data Flow
//!
//! 1. Caller builds an `EconomyCommand` from validated input
//! 2. `EconomyService` builds a read-only context snapshot
//! 3. Registered policies are evaluated; any failure aborts the command
//! 4. The command's action executes inside one transaction
//! 5. On commit, domain events are broadcast to all subscribers
//! 6. A `CommandResponse` is returned to the caller
//!
//! The HTTP surface (routing, validation DTOs, response envelopes) is an
//! external collaborator and lives outside this crate.

pub mod core;
pub mod db;
pub mod economy;
pub mod services;

// Re-exports
pub use crate::core::{Config, ServerState};
pub use db::DbService;
pub use economy::{EconomyError, EconomyService, EventBus};
pub use services::{GamificationService, GamificationWorker, RankService, ReferralService, UserService};
