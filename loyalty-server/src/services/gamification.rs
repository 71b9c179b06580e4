//! Gamification Service - achievement evaluation
//!
//! 成就系统。Evaluation is reactive: a worker listens for point credits
//! and re-evaluates the affected user against all active achievements.
//! Unlocks are idempotent (one row per achievement/user pair), so
//! re-evaluating after a crash or a lagged event stream is safe.

use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

use crate::db::repository::{achievement, action_log};
use crate::economy::error::EconomyError;
use crate::economy::events::EventBus;
use crate::services::RankService;
use shared::economy::{EconomyEvent, EconomyEventType, EventPayload};
use shared::models::{AchievementCriteria, ActionType};
use shared::util::now_millis;

pub struct GamificationService {
    pool: SqlitePool,
}

impl GamificationService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Re-evaluate one user against all active achievements.
    ///
    /// Each newly met achievement is unlocked and its bonus credited in
    /// one transaction. Already-unlocked achievements are skipped by the
    /// unlock row's uniqueness, never by in-memory state. `command_id`
    /// is the triggering command, carried through for audit tracing.
    pub async fn evaluate_user(
        &self,
        user_id: i64,
        command_id: &str,
    ) -> Result<Vec<EconomyEvent>, EconomyError> {
        let achievements = achievement::list_active(&self.pool).await?;
        if achievements.is_empty() {
            return Ok(vec![]);
        }

        let mut tx = self.pool.begin().await.map_err(crate::db::repository::RepoError::from)?;
        let now = now_millis();

        let lifetime = action_log::lifetime_points(&mut *tx, user_id).await?;
        let scans = action_log::count_for_user(&mut *tx, user_id, ActionType::ProductScan).await?;
        let redemptions =
            action_log::count_for_user(&mut *tx, user_id, ActionType::Redemption).await?;

        let mut events = Vec::new();
        for a in achievements {
            let met = match a.criteria_type {
                AchievementCriteria::TotalPoints => lifetime >= a.threshold,
                AchievementCriteria::ScanCount => scans >= a.threshold,
                AchievementCriteria::RedemptionCount => redemptions >= a.threshold,
            };
            if !met {
                continue;
            }
            if !achievement::record_unlock(&mut *tx, a.id, user_id, now).await? {
                continue;
            }

            tracing::info!(user_id, achievement = %a.name, "Achievement unlocked");
            if a.bonus_points > 0 {
                let metadata = serde_json::json!({ "achievement_id": a.id }).to_string();
                action_log::append(
                    &mut *tx,
                    user_id,
                    ActionType::AchievementBonus,
                    a.bonus_points,
                    Some(metadata),
                    Some(command_id),
                    now,
                )
                .await?;
            }
            events.push(EconomyEvent::new(
                command_id.to_string(),
                EconomyEventType::AchievementUnlocked,
                EventPayload::AchievementUnlocked {
                    user_id,
                    achievement_id: a.id,
                    bonus_points: a.bonus_points,
                },
            ));
        }

        tx.commit().await.map_err(crate::db::repository::RepoError::from)?;
        Ok(events)
    }
}

/// Broadcast-consuming worker that drives reactive evaluation.
///
/// Only `AchievementUnlocked` events are re-broadcast; the worker never
/// emits the `PointsCredited` events it listens for, so it cannot
/// retrigger itself.
pub struct GamificationWorker {
    service: GamificationService,
    bus: EventBus,
    rank: Arc<RankService>,
}

impl GamificationWorker {
    pub fn new(service: GamificationService, bus: EventBus, rank: Arc<RankService>) -> Self {
        Self { service, bus, rank }
    }

    pub async fn run(self) {
        let mut rx = self.bus.subscribe();
        tracing::info!("Gamification worker started");
        loop {
            match rx.recv().await {
                Ok(event) => self.handle(event).await,
                Err(RecvError::Lagged(skipped)) => {
                    // 落后了也没关系：评估是幂等的，下一个事件会补上
                    tracing::warn!(skipped, "Gamification worker lagged behind event stream");
                }
                Err(RecvError::Closed) => {
                    tracing::info!("Event bus closed, gamification worker stopping");
                    break;
                }
            }
        }
    }

    async fn handle(&self, event: EconomyEvent) {
        let user_id = match &event.payload {
            EventPayload::PointsCredited { user_id, .. } => *user_id,
            _ => return,
        };
        match self.service.evaluate_user(user_id, &event.command_id).await {
            Ok(unlocks) => {
                if !unlocks.is_empty() {
                    // Bonus credits changed the balance outside the
                    // dispatcher's invalidation path
                    self.rank.invalidate(user_id);
                    self.bus.broadcast_all(&unlocks);
                }
            }
            Err(e) => {
                tracing::error!(user_id, error = %e, "Achievement evaluation failed");
            }
        }
    }
}
