//! RedeemReward command handler
//!
//! Debit-and-order-creation-and-ledger-append is one atomic unit: all
//! three writes go through the context transaction.

use async_trait::async_trait;

use crate::db::repository::{action_log, order, product};
use crate::economy::error::EconomyError;
use crate::economy::traits::{CommandContext, CommandHandler};
use shared::economy::{EconomyEvent, EconomyEventType, EventPayload};
use shared::models::ActionType;
use shared::util::snowflake_id;

/// RedeemReward action
#[derive(Debug, Clone)]
pub struct RedeemRewardAction {
    pub user_id: i64,
    pub product_id: i64,
}

#[async_trait]
impl CommandHandler for RedeemRewardAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
    ) -> Result<Vec<EconomyEvent>, EconomyError> {
        // 1. Load the product inside the transaction
        let product = product::find(&mut *ctx.tx, self.product_id)
            .await?
            .ok_or(EconomyError::ProductNotFound(self.product_id))?;
        let cost = product.point_cost;

        // 2. Authoritative balance re-check. The policy gate already ran
        //    an affordability check, but the balance can change between
        //    policy evaluation and execution; this read shares the
        //    transaction with the debit below.
        let balance = action_log::sum_points_for_user(&mut *ctx.tx, self.user_id).await?;
        if balance < cost {
            return Err(EconomyError::InsufficientFunds {
                required: cost,
                balance,
            });
        }

        // 3. Create the order
        let order_id = snowflake_id();
        order::create(
            &mut *ctx.tx,
            order_id,
            self.user_id,
            product.id,
            cost,
            ctx.meta.timestamp,
        )
        .await?;

        // 4. Append the negative ledger entry
        let metadata = serde_json::json!({
            "order_id": order_id,
            "product_id": product.id,
        });
        action_log::append(
            &mut *ctx.tx,
            self.user_id,
            ActionType::Redemption,
            -cost,
            Some(metadata.to_string()),
            Some(ctx.meta.command_id.as_str()),
            ctx.meta.timestamp,
        )
        .await?;

        Ok(vec![
            EconomyEvent::new(
                ctx.meta.command_id.clone(),
                EconomyEventType::OrderCreated,
                EventPayload::OrderCreated {
                    order_id,
                    user_id: self.user_id,
                    product_id: product.id,
                    cost_in_points: cost,
                },
            ),
            EconomyEvent::new(
                ctx.meta.command_id.clone(),
                EconomyEventType::PointsDebited,
                EventPayload::PointsDebited {
                    user_id: self.user_id,
                    points: cost,
                    new_balance: balance - cost,
                    order_id,
                },
            ),
        ])
    }
}
