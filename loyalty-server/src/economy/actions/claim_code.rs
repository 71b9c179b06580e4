//! ProcessUnauthenticatedClaim command handler
//!
//! A claim reserves a code for a not-yet-registered user. No points move
//! here; the credit happens when the claim token is redeemed through
//! registration. Claims expire after `CLAIM_TTL_MS` and are lazily
//! released by the next claim or scan attempt on the same code.

use async_trait::async_trait;
use uuid::Uuid;

use crate::db::repository::{claim_token, reward_code};
use crate::economy::error::EconomyError;
use crate::economy::traits::{CommandContext, CommandHandler};
use shared::economy::{EconomyEvent, EconomyEventType, EventPayload};
use shared::models::RewardCodeStatus;

/// ProcessUnauthenticatedClaim action
#[derive(Debug, Clone)]
pub struct ClaimCodeAction {
    pub code: String,
}

#[async_trait]
impl CommandHandler for ClaimCodeAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
    ) -> Result<Vec<EconomyEvent>, EconomyError> {
        let cutoff = ctx.meta.timestamp - ctx.config.claim_ttl_ms;
        if reward_code::release_expired_claim(&mut *ctx.tx, &self.code, cutoff).await? {
            tracing::debug!(code = %self.code, "Released expired claim before re-claim");
        }

        let rc = reward_code::find_by_code(&mut *ctx.tx, &self.code)
            .await?
            .ok_or_else(|| EconomyError::CodeNotFound(self.code.clone()))?;
        if rc.status != RewardCodeStatus::Unused {
            return Err(EconomyError::CodeAlreadyConsumed(self.code.clone()));
        }

        // CAS UNUSED → CLAIMED; the claim has no owner yet
        let won = reward_code::transition(
            &mut *ctx.tx,
            &self.code,
            RewardCodeStatus::Unused,
            RewardCodeStatus::Claimed,
            None,
            ctx.meta.timestamp,
        )
        .await?;
        if !won {
            return Err(EconomyError::CodeAlreadyConsumed(self.code.clone()));
        }

        let token = Uuid::new_v4().to_string();
        let expires_at = ctx.meta.timestamp + ctx.config.claim_ttl_ms;
        claim_token::create(&mut *ctx.tx, &token, &self.code, ctx.meta.timestamp, expires_at)
            .await?;

        Ok(vec![EconomyEvent::new(
            ctx.meta.command_id.clone(),
            EconomyEventType::CodeClaimed,
            EventPayload::CodeClaimed {
                code: self.code.clone(),
                product_id: rc.product_id,
                claim_token: token,
                expires_at,
            },
        )])
    }
}
