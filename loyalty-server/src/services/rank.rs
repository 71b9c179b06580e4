//! Rank Service
//!
//! Ranks are derived from lifetime credited points, never stored. The
//! derivation is cached per user; ledger writes invalidate the entry, so
//! a stale rank survives at most until the next balance change.

use dashmap::DashMap;
use sqlx::SqlitePool;

use crate::db::repository::{action_log, RepoResult};
use shared::models::{Rank, RankThresholds};

pub struct RankService {
    pool: SqlitePool,
    thresholds: RankThresholds,
    cache: DashMap<i64, Rank>,
}

impl RankService {
    pub fn new(pool: SqlitePool, thresholds: RankThresholds) -> Self {
        Self {
            pool,
            thresholds,
            cache: DashMap::new(),
        }
    }

    pub async fn rank_for(&self, user_id: i64) -> RepoResult<Rank> {
        if let Some(rank) = self.cache.get(&user_id) {
            return Ok(*rank);
        }
        let lifetime = action_log::lifetime_points(&self.pool, user_id).await?;
        let rank = Rank::from_lifetime_points(lifetime, &self.thresholds);
        self.cache.insert(user_id, rank);
        Ok(rank)
    }

    pub fn invalidate(&self, user_id: i64) {
        self.cache.remove(&user_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use shared::models::ActionType;
    use shared::util::now_millis;

    #[tokio::test]
    async fn rank_is_cached_until_invalidated() {
        let db = DbService::open_in_memory().await.unwrap();
        let svc = RankService::new(db.pool.clone(), RankThresholds::default());
        let now = now_millis();

        assert_eq!(svc.rank_for(1).await.unwrap(), Rank::Bronze);

        action_log::append(&db.pool, 1, ActionType::ProductScan, 600, None, None, now)
            .await
            .unwrap();
        // Cached value survives the write
        assert_eq!(svc.rank_for(1).await.unwrap(), Rank::Bronze);

        svc.invalidate(1);
        assert_eq!(svc.rank_for(1).await.unwrap(), Rank::Silver);
    }

    #[tokio::test]
    async fn redemptions_do_not_lower_rank() {
        let db = DbService::open_in_memory().await.unwrap();
        let svc = RankService::new(db.pool.clone(), RankThresholds::default());
        let now = now_millis();

        action_log::append(&db.pool, 2, ActionType::ProductScan, 600, None, None, now)
            .await
            .unwrap();
        action_log::append(&db.pool, 2, ActionType::Redemption, -550, None, None, now)
            .await
            .unwrap();

        // Lifetime points only count credits
        assert_eq!(svc.rank_for(2).await.unwrap(), Rank::Silver);
    }
}
