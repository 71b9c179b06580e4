//! Context Builder - read-only per-command state snapshot
//!
//! Policies and handlers see the same snapshot so one command execution
//! evaluates against one consistent view. The snapshot is advisory for
//! balance decisions: the authoritative re-check happens inside the
//! handler's transaction (time-of-check/time-of-use).

use crate::db::repository::{action_log, product, user};
use crate::economy::error::EconomyError;
use crate::services::RankService;
use shared::economy::{EconomyCommand, EconomyCommandPayload};
use shared::models::{Product, Rank, User};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Snapshot of one user's derived state
#[derive(Debug, Clone)]
pub struct UserSnapshot {
    pub user: User,
    pub balance: i64,
    pub lifetime_points: i64,
    pub rank: Rank,
}

/// Read-only snapshot assembled for one command execution
#[derive(Debug, Clone, Default)]
pub struct EvalContext {
    pub user: Option<UserSnapshot>,
    /// Loaded for redemption commands (policies need the cost)
    pub product: Option<Product>,
}

/// Assembles `EvalContext` snapshots from current persistent state
#[derive(Clone)]
pub struct ContextBuilderService {
    pool: SqlitePool,
    rank: Arc<RankService>,
}

impl ContextBuilderService {
    pub fn new(pool: SqlitePool, rank: Arc<RankService>) -> Self {
        Self { pool, rank }
    }

    pub async fn build(&self, command: &EconomyCommand) -> Result<EvalContext, EconomyError> {
        let mut ctx = EvalContext::default();

        if let Some(user_id) = command.subject_user() {
            let user = user::find(&self.pool, user_id)
                .await?
                .ok_or(EconomyError::UserNotFound(user_id))?;
            let balance = action_log::sum_points_for_user(&self.pool, user_id).await?;
            let lifetime_points = action_log::lifetime_points(&self.pool, user_id).await?;
            let rank = self.rank.rank_for(user_id).await?;
            ctx.user = Some(UserSnapshot {
                user,
                balance,
                lifetime_points,
                rank,
            });
        }

        if let EconomyCommandPayload::RedeemReward { product_id, .. } = &command.payload {
            let product = product::find(&self.pool, *product_id)
                .await?
                .ok_or(EconomyError::ProductNotFound(*product_id))?;
            ctx.product = Some(product);
        }

        Ok(ctx)
    }
}
