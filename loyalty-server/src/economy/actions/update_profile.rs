//! UpdateProfile command handler

use async_trait::async_trait;

use crate::db::repository::user;
use crate::economy::error::EconomyError;
use crate::economy::traits::{CommandContext, CommandHandler};
use shared::economy::{EconomyEvent, EconomyEventType, EventPayload};
use shared::models::ProfileChanges;

/// UpdateProfile action
///
/// Only mutable fields are touched: display name and free-form metadata.
/// Email, referral code and `referred_by` are immutable after creation.
#[derive(Debug, Clone)]
pub struct UpdateProfileAction {
    pub user_id: i64,
    pub changes: ProfileChanges,
}

#[async_trait]
impl CommandHandler for UpdateProfileAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
    ) -> Result<Vec<EconomyEvent>, EconomyError> {
        if let Some(display_name) = &self.changes.display_name {
            let updated = user::update_display_name(
                &mut *ctx.tx,
                self.user_id,
                display_name,
                ctx.meta.timestamp,
            )
            .await?;
            if !updated {
                return Err(EconomyError::UserNotFound(self.user_id));
            }
        }

        if let Some(meta) = &self.changes.meta {
            for (key, value) in meta {
                user::update_meta(&mut *ctx.tx, self.user_id, key, value, ctx.meta.timestamp)
                    .await?;
            }
        }

        Ok(vec![EconomyEvent::new(
            ctx.meta.command_id.clone(),
            EconomyEventType::ProfileUpdated,
            EventPayload::ProfileUpdated {
                user_id: self.user_id,
            },
        )])
    }
}
