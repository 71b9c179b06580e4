//! Economy Service - the command dispatch façade
//!
//! 命令执行流程：
//!
//! 1. Build a read-only context snapshot
//! 2. Evaluate registered policies (first failure aborts)
//! 3. Execute the command's action inside one transaction
//! 4. Commit, then broadcast the produced events
//!
//! Every error path rolls the transaction back; a command either happens
//! completely or not at all. Events are broadcast only after commit, so
//! subscribers never observe state that later disappears.

use sqlx::SqlitePool;
use std::sync::Arc;

use crate::core::Config;
use crate::economy::actions::CommandAction;
use crate::economy::context::ContextBuilderService;
use crate::economy::error::EconomyError;
use crate::economy::events::EventBus;
use crate::economy::policy::PolicyGate;
use crate::economy::traits::{CommandContext, CommandHandler, CommandMeta};
use crate::services::RankService;
use shared::economy::{
    CommandKind, CommandResponse, EconomyCommand, EconomyEvent, EventPayload,
};
use shared::util::now_millis;

pub struct EconomyService {
    pool: SqlitePool,
    config: Config,
    gate: PolicyGate,
    context_builder: ContextBuilderService,
    bus: EventBus,
    rank: Arc<RankService>,
}

impl EconomyService {
    pub fn new(
        pool: SqlitePool,
        config: Config,
        gate: PolicyGate,
        bus: EventBus,
        rank: Arc<RankService>,
    ) -> Self {
        let context_builder = ContextBuilderService::new(pool.clone(), rank.clone());
        Self {
            pool,
            config,
            gate,
            context_builder,
            bus,
            rank,
        }
    }

    /// Execute one command and return its response.
    ///
    /// Never returns Err: every failure is folded into an unsuccessful
    /// `CommandResponse` with a machine-readable error code.
    pub async fn execute_command(&self, command: &EconomyCommand) -> CommandResponse {
        tracing::info!(command_id = %command.command_id, kind = %command.kind(), "Executing command");
        match self.dispatch(command).await {
            Ok(events) => {
                self.invalidate_ranks(&events).await;
                self.bus.broadcast_all(&events);
                CommandResponse::from_events(command.command_id.clone(), events.as_slice())
            }
            Err(err) => {
                tracing::warn!(
                    command_id = %command.command_id,
                    kind = %command.kind(),
                    error = %err,
                    "Command failed"
                );
                CommandResponse::error(command.command_id.clone(), err.into())
            }
        }
    }

    async fn dispatch(&self, command: &EconomyCommand) -> Result<Vec<EconomyEvent>, EconomyError> {
        // RegisterWithToken is two-phase and cannot run under the single
        // transaction this dispatcher owns; UserService orchestrates it.
        if command.kind() == CommandKind::RegisterWithToken {
            return Err(EconomyError::Configuration(
                "RegisterWithToken must be dispatched through UserService".into(),
            ));
        }

        let snapshot = self.context_builder.build(command).await?;
        self.gate.check(command, &snapshot)?;

        let action = CommandAction::from(command);
        let meta = CommandMeta {
            command_id: command.command_id.clone(),
            timestamp: now_millis(),
        };

        let mut tx = self.pool.begin().await.map_err(crate::db::repository::RepoError::from)?;
        let events = {
            let mut ctx = CommandContext {
                tx: &mut *tx,
                meta: &meta,
                config: &self.config,
                snapshot: &snapshot,
            };
            action.execute(&mut ctx).await?
        };
        tx.commit().await.map_err(crate::db::repository::RepoError::from)?;

        Ok(events)
    }

    /// Drop cached ranks for every user whose balance just moved
    async fn invalidate_ranks(&self, events: &[EconomyEvent]) {
        for event in events {
            match &event.payload {
                EventPayload::PointsCredited { user_id, .. }
                | EventPayload::PointsDebited { user_id, .. } => {
                    self.rank.invalidate(*user_id);
                }
                _ => {}
            }
        }
    }
}
