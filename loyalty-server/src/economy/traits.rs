//! Command handler trait and execution context

use crate::core::Config;
use crate::economy::context::EvalContext;
use crate::economy::error::EconomyError;
use async_trait::async_trait;
use shared::economy::EconomyEvent;
use sqlx::SqliteConnection;

/// Server-side metadata for one command execution
#[derive(Debug, Clone)]
pub struct CommandMeta {
    /// Command ID from the inbound command (audit tracing)
    pub command_id: String,
    /// Server timestamp, authoritative for all writes in this execution
    pub timestamp: i64,
}

/// Execution context for one command.
///
/// `tx` is the single transactional boundary: every write a handler makes
/// goes through it, so either all of them commit or none do. The snapshot
/// is the read-only view policies already saw; handlers must re-check any
/// balance-dependent decision against `tx` (the snapshot can be stale
/// under concurrency).
pub struct CommandContext<'a> {
    pub tx: &'a mut SqliteConnection,
    pub meta: &'a CommandMeta,
    pub config: &'a Config,
    pub snapshot: &'a EvalContext,
}

/// One handler per command type.
///
/// Handlers read state through the context transaction, compute the
/// transition, write all mutations, append ledger entries, and return the
/// domain events describing what happened. They never broadcast — the
/// dispatching service does that after commit.
#[async_trait]
pub trait CommandHandler {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
    ) -> Result<Vec<EconomyEvent>, EconomyError>;
}
