//! User Service - registration orchestration
//!
//! Owns `RegisterWithToken`, the one flow that cannot run under a single
//! transaction: user creation must be durable before the claimed code is
//! consumed, so a crash between the two leaves a registered user with a
//! still-pending claim rather than a consumed code with no owner.
//!
//! Phase 1: create the user and bind the claim token to them (one tx).
//! Phase 2: consume the claimed code and credit the points (second tx).
//! A retry after a phase-2 failure finds the bound user on the token and
//! resumes at phase 2 instead of creating a duplicate.

use sqlx::SqlitePool;
use std::sync::Arc;

use crate::core::Config;
use crate::db::repository::{action_log, claim_token, product, reward_code, RepoError};
use crate::economy::actions::CreateUserAction;
use crate::economy::context::EvalContext;
use crate::economy::error::EconomyError;
use crate::economy::events::EventBus;
use crate::economy::traits::{CommandContext, CommandHandler, CommandMeta};
use crate::services::RankService;
use shared::economy::{
    CommandResponse, EconomyCommand, EconomyCommandPayload, EconomyEvent, EconomyEventType,
    EventPayload,
};
use shared::models::{ActionType, NewUserProfile, RewardCodeStatus};
use shared::util::now_millis;

pub struct UserService {
    pool: SqlitePool,
    config: Config,
    bus: EventBus,
    rank: Arc<RankService>,
}

impl UserService {
    pub fn new(pool: SqlitePool, config: Config, bus: EventBus, rank: Arc<RankService>) -> Self {
        Self {
            pool,
            config,
            bus,
            rank,
        }
    }

    /// Execute a `RegisterWithToken` command.
    ///
    /// Any other payload is a dispatch wiring error and comes back as a
    /// configuration failure.
    pub async fn execute_register(&self, command: &EconomyCommand) -> CommandResponse {
        let (token, profile) = match &command.payload {
            EconomyCommandPayload::RegisterWithToken {
                claim_token,
                profile,
            } => (claim_token, profile),
            _ => {
                return CommandResponse::error(
                    command.command_id.clone(),
                    EconomyError::Configuration(
                        "UserService only handles RegisterWithToken".into(),
                    )
                    .into(),
                );
            }
        };

        tracing::info!(command_id = %command.command_id, "Executing registration with claim token");
        match self.register(token, profile, &command.command_id).await {
            Ok(events) => {
                for event in &events {
                    if let EventPayload::PointsCredited { user_id, .. } = &event.payload {
                        self.rank.invalidate(*user_id);
                    }
                }
                self.bus.broadcast_all(&events);
                CommandResponse::from_events(command.command_id.clone(), &events)
            }
            Err(err) => {
                tracing::warn!(command_id = %command.command_id, error = %err, "Registration failed");
                CommandResponse::error(command.command_id.clone(), err.into())
            }
        }
    }

    async fn register(
        &self,
        token: &str,
        profile: &NewUserProfile,
        command_id: &str,
    ) -> Result<Vec<EconomyEvent>, EconomyError> {
        let now = now_millis();
        let meta = CommandMeta {
            command_id: command_id.to_string(),
            timestamp: now,
        };

        // ---- Phase 1: create the user, bind the token ----
        let mut tx = self.pool.begin().await.map_err(RepoError::from)?;

        let claim = claim_token::find(&mut *tx, token)
            .await?
            .ok_or(EconomyError::ClaimTokenNotFound)?;
        if claim.consumed_at.is_some() {
            return Err(EconomyError::CodeAlreadyConsumed(claim.code));
        }

        let mut events = Vec::new();
        let user_id = match claim.registered_user_id {
            // Retry of a registration whose phase 2 never finished
            Some(existing) => {
                tracing::info!(user_id = existing, "Resuming registration at credit phase");
                existing
            }
            None => {
                if claim.is_expired(now) {
                    return Err(EconomyError::ClaimExpired);
                }
                let snapshot = EvalContext::default();
                let action = CreateUserAction {
                    profile: profile.clone(),
                };
                let created = {
                    let mut ctx = CommandContext {
                        tx: &mut *tx,
                        meta: &meta,
                        config: &self.config,
                        snapshot: &snapshot,
                    };
                    action.execute(&mut ctx).await?
                };
                let user_id = created
                    .iter()
                    .find_map(|e| match &e.payload {
                        EventPayload::UserCreated { user_id, .. } => Some(*user_id),
                        _ => None,
                    })
                    .ok_or_else(|| {
                        EconomyError::Configuration("user creation produced no event".into())
                    })?;
                if !claim_token::bind_user(&mut *tx, token, user_id).await? {
                    return Err(EconomyError::Conflict(
                        "claim token already bound by a concurrent registration".into(),
                    ));
                }
                events.extend(created);
                user_id
            }
        };
        tx.commit().await.map_err(RepoError::from)?;

        // ---- Phase 2: consume the code, credit the points ----
        let mut tx = self.pool.begin().await.map_err(RepoError::from)?;

        if !claim_token::mark_consumed(&mut *tx, token, now).await? {
            return Err(EconomyError::Conflict(
                "claim token consumed by a concurrent registration".into(),
            ));
        }

        let won = reward_code::transition(
            &mut *tx,
            &claim.code,
            RewardCodeStatus::Claimed,
            RewardCodeStatus::Consumed,
            Some(user_id),
            now,
        )
        .await?;
        if !won {
            // The reservation lapsed and someone else took the code
            return Err(EconomyError::CodeAlreadyConsumed(claim.code));
        }

        let rc = reward_code::find_by_code(&mut *tx, &claim.code)
            .await?
            .ok_or_else(|| EconomyError::CodeNotFound(claim.code.clone()))?;
        let prod = product::find(&mut *tx, rc.product_id)
            .await?
            .ok_or(EconomyError::ProductNotFound(rc.product_id))?;

        let balance = action_log::sum_points_for_user(&mut *tx, user_id).await?;
        let metadata = serde_json::json!({
            "code": claim.code,
            "claim_token": token,
        });
        action_log::append(
            &mut *tx,
            user_id,
            ActionType::ProductScan,
            prod.point_value,
            Some(metadata.to_string()),
            Some(command_id),
            now,
        )
        .await?;

        tx.commit().await.map_err(RepoError::from)?;

        events.push(EconomyEvent::new(
            command_id.to_string(),
            EconomyEventType::CodeConsumed,
            EventPayload::CodeConsumed {
                code: claim.code.clone(),
                product_id: prod.id,
                user_id,
            },
        ));
        events.push(EconomyEvent::new(
            command_id.to_string(),
            EconomyEventType::PointsCredited,
            EventPayload::PointsCredited {
                user_id,
                points: prod.point_value,
                new_balance: balance + prod.point_value,
                action: ActionType::ProductScan.as_str().to_string(),
            },
        ));

        Ok(events)
    }
}
