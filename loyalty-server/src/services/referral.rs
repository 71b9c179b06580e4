//! Referral Service
//!
//! Credits both sides of a referral when the referee registers. The two
//! ledger appends run on the caller's transaction, so they commit or roll
//! back together with the registration itself.

use sqlx::SqliteConnection;

use crate::core::Config;
use crate::db::repository::action_log;
use crate::economy::error::EconomyError;
use shared::economy::{EconomyEvent, EconomyEventType, EventPayload};
use shared::models::ActionType;

pub struct ReferralService {
    referrer_bonus: i64,
    referee_bonus: i64,
}

impl ReferralService {
    pub fn new(config: &Config) -> Self {
        Self {
            referrer_bonus: config.referrer_bonus,
            referee_bonus: config.referee_bonus,
        }
    }

    /// Credit referrer and referee for one registration.
    ///
    /// Idempotent per referee: a user can only ever be referred once, so
    /// an existing referee-bonus entry means this registration was
    /// already credited and the call is a no-op.
    pub async fn credit_registration(
        &self,
        tx: &mut SqliteConnection,
        command_id: &str,
        now: i64,
        referrer_id: i64,
        referee_id: i64,
    ) -> Result<Vec<EconomyEvent>, EconomyError> {
        if action_log::has_entry(&mut *tx, referee_id, ActionType::ReferralBonusReferee).await? {
            tracing::debug!(referee_id, "Referral already credited, skipping");
            return Ok(vec![]);
        }

        let metadata = serde_json::json!({
            "referrer_id": referrer_id,
            "referee_id": referee_id,
        })
        .to_string();

        let referrer_balance = action_log::sum_points_for_user(&mut *tx, referrer_id).await?;
        action_log::append(
            &mut *tx,
            referrer_id,
            ActionType::ReferralBonusReferrer,
            self.referrer_bonus,
            Some(metadata.clone()),
            Some(command_id),
            now,
        )
        .await?;

        let referee_balance = action_log::sum_points_for_user(&mut *tx, referee_id).await?;
        action_log::append(
            &mut *tx,
            referee_id,
            ActionType::ReferralBonusReferee,
            self.referee_bonus,
            Some(metadata),
            Some(command_id),
            now,
        )
        .await?;

        Ok(vec![
            EconomyEvent::new(
                command_id.to_string(),
                EconomyEventType::ReferralCredited,
                EventPayload::ReferralCredited {
                    referrer_id,
                    referee_id,
                    referrer_bonus: self.referrer_bonus,
                    referee_bonus: self.referee_bonus,
                },
            ),
            EconomyEvent::new(
                command_id.to_string(),
                EconomyEventType::PointsCredited,
                EventPayload::PointsCredited {
                    user_id: referrer_id,
                    points: self.referrer_bonus,
                    new_balance: referrer_balance + self.referrer_bonus,
                    action: ActionType::ReferralBonusReferrer.as_str().to_string(),
                },
            ),
            EconomyEvent::new(
                command_id.to_string(),
                EconomyEventType::PointsCredited,
                EventPayload::PointsCredited {
                    user_id: referee_id,
                    points: self.referee_bonus,
                    new_balance: referee_balance + self.referee_bonus,
                    action: ActionType::ReferralBonusReferee.as_str().to_string(),
                },
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::repository::user;
    use shared::util::now_millis;

    #[tokio::test]
    async fn crediting_twice_only_appends_once() {
        let db = DbService::open_in_memory().await.unwrap();
        let now = now_millis();
        user::create(&db.pool, 10, "ref@example.com", "Ref", "CODEREF", None, now)
            .await
            .unwrap();
        user::create(&db.pool, 20, "new@example.com", "New", "CODENEW", Some(10), now)
            .await
            .unwrap();

        let svc = ReferralService::new(&Config::default());

        let mut tx = db.pool.begin().await.unwrap();
        let events = svc
            .credit_registration(&mut tx, "cmd-1", now, 10, 20)
            .await
            .unwrap();
        tx.commit().await.unwrap();
        assert_eq!(events.len(), 3);

        let mut tx = db.pool.begin().await.unwrap();
        let again = svc
            .credit_registration(&mut tx, "cmd-2", now, 10, 20)
            .await
            .unwrap();
        tx.commit().await.unwrap();
        assert!(again.is_empty());

        assert_eq!(action_log::sum_points_for_user(&db.pool, 10).await.unwrap(), 100);
        assert_eq!(action_log::sum_points_for_user(&db.pool, 20).await.unwrap(), 50);
    }
}
