//! CreateUser command handler
//!
//! User creation and both-sides referral crediting share one transaction.
//! `referred_by` is resolved from the supplied referral code at creation
//! and never changes afterwards.

use async_trait::async_trait;

use crate::db::repository::{user, RepoError};
use crate::economy::error::EconomyError;
use crate::economy::traits::{CommandContext, CommandHandler};
use crate::services::ReferralService;
use shared::economy::{EconomyEvent, EconomyEventType, EventPayload};
use shared::models::NewUserProfile;
use shared::util::{referral_code, snowflake_id};

/// CreateUser action
#[derive(Debug, Clone)]
pub struct CreateUserAction {
    pub profile: NewUserProfile,
}

#[async_trait]
impl CommandHandler for CreateUserAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
    ) -> Result<Vec<EconomyEvent>, EconomyError> {
        // 1. Resolve the referrer, if a referral code was supplied
        let referred_by = match &self.profile.referral_code {
            Some(code) => {
                let referrer = user::find_by_referral_code(&mut *ctx.tx, code)
                    .await?
                    .ok_or_else(|| EconomyError::ReferralCodeUnknown(code.clone()))?;
                Some(referrer.id)
            }
            None => None,
        };

        // 2. Insert. The unique index is authoritative for email conflicts;
        //    no pre-check read, the race would make it advisory anyway.
        let user_id = snowflake_id();
        let own_code = referral_code();
        let created = user::create(
            &mut *ctx.tx,
            user_id,
            &self.profile.email,
            &self.profile.display_name,
            &own_code,
            referred_by,
            ctx.meta.timestamp,
        )
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(msg) if msg.contains("email") => {
                EconomyError::EmailTaken(self.profile.email.clone())
            }
            other => EconomyError::Repo(other),
        })?;

        let mut events = vec![EconomyEvent::new(
            ctx.meta.command_id.clone(),
            EconomyEventType::UserCreated,
            EventPayload::UserCreated {
                user_id: created.id,
                email: created.email.clone(),
                referral_code: created.referral_code.clone(),
                referred_by,
            },
        )];

        // 3. Credit both sides of the referral in the same transaction
        if let Some(referrer_id) = referred_by {
            let referral = ReferralService::new(ctx.config);
            events.extend(
                referral
                    .credit_registration(
                        &mut *ctx.tx,
                        &ctx.meta.command_id,
                        ctx.meta.timestamp,
                        referrer_id,
                        created.id,
                    )
                    .await?,
            );
        }

        Ok(events)
    }
}
