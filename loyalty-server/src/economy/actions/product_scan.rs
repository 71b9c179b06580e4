//! ProcessProductScan command handler
//!
//! 扫码加积分。Consuming the code and crediting the points share one
//! transaction; a scan can never consume a code without crediting, or
//! credit without consuming.

use async_trait::async_trait;

use crate::db::repository::{action_log, product, reward_code};
use crate::economy::actions::RedeemRewardAction;
use crate::economy::error::EconomyError;
use crate::economy::traits::{CommandContext, CommandHandler};
use shared::economy::{EconomyEvent, EconomyEventType, EventPayload};
use shared::models::{ActionType, RewardCodeStatus};

/// ProcessProductScan action
#[derive(Debug, Clone)]
pub struct ProcessProductScanAction {
    pub user_id: i64,
    pub code: String,
}

#[async_trait]
impl CommandHandler for ProcessProductScanAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
    ) -> Result<Vec<EconomyEvent>, EconomyError> {
        // 1. Lazily release a stale unauthenticated claim on this code
        let cutoff = ctx.meta.timestamp - ctx.config.claim_ttl_ms;
        if reward_code::release_expired_claim(&mut *ctx.tx, &self.code, cutoff).await? {
            tracing::debug!(code = %self.code, "Released expired claim before scan");
        }

        // 2. Look up the code
        let rc = reward_code::find_by_code(&mut *ctx.tx, &self.code)
            .await?
            .ok_or_else(|| EconomyError::CodeNotFound(self.code.clone()))?;
        if rc.status != RewardCodeStatus::Unused {
            return Err(EconomyError::CodeAlreadyConsumed(self.code.clone()));
        }

        // 3. Compare-and-set UNUSED → CONSUMED. Losing the race reads the
        //    same as an already-used code.
        let won = reward_code::transition(
            &mut *ctx.tx,
            &self.code,
            RewardCodeStatus::Unused,
            RewardCodeStatus::Consumed,
            Some(self.user_id),
            ctx.meta.timestamp,
        )
        .await?;
        if !won {
            return Err(EconomyError::CodeAlreadyConsumed(self.code.clone()));
        }

        let product = product::find(&mut *ctx.tx, rc.product_id)
            .await?
            .ok_or(EconomyError::ProductNotFound(rc.product_id))?;

        // 4. Credit the scan value
        let balance = action_log::sum_points_for_user(&mut *ctx.tx, self.user_id).await?;
        let metadata = serde_json::json!({
            "code": self.code,
            "product_id": product.id,
        });
        action_log::append(
            &mut *ctx.tx,
            self.user_id,
            ActionType::ProductScan,
            product.point_value,
            Some(metadata.to_string()),
            Some(ctx.meta.command_id.as_str()),
            ctx.meta.timestamp,
        )
        .await?;

        let mut events = vec![
            EconomyEvent::new(
                ctx.meta.command_id.clone(),
                EconomyEventType::CodeConsumed,
                EventPayload::CodeConsumed {
                    code: self.code.clone(),
                    product_id: product.id,
                    user_id: self.user_id,
                },
            ),
            EconomyEvent::new(
                ctx.meta.command_id.clone(),
                EconomyEventType::PointsCredited,
                EventPayload::PointsCredited {
                    user_id: self.user_id,
                    points: product.point_value,
                    new_balance: balance + product.point_value,
                    action: ActionType::ProductScan.as_str().to_string(),
                },
            ),
        ];

        // 5. Instant-redeem products immediately spend the credited points
        //    on themselves, inside the same transaction. If the user still
        //    cannot afford it, the whole scan rolls back.
        if product.redeem_on_scan && product.point_cost > 0 {
            let redeem = RedeemRewardAction {
                user_id: self.user_id,
                product_id: product.id,
            };
            events.extend(redeem.execute(ctx).await?);
        }

        Ok(events)
    }
}
