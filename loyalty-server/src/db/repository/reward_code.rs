//! Reward Code Repository
//!
//! The status transition is a single conditional UPDATE (compare-and-set),
//! never read-then-write: under concurrent attempts on the same code
//! exactly one caller observes `rows_affected == 1`.

use super::RepoResult;
use shared::models::{RewardCode, RewardCodeStatus};
use sqlx::{Executor, Sqlite};

pub async fn find_by_code<'e, E>(ex: E, code: &str) -> RepoResult<Option<RewardCode>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query_as::<_, RewardCode>(
        "SELECT code, product_id, status, claimed_by, claimed_at, created_at FROM reward_codes WHERE code = ?",
    )
    .bind(code)
    .fetch_optional(ex)
    .await?;
    Ok(row)
}

pub async fn create<'e, E>(ex: E, code: &str, product_id: i64, now: i64) -> RepoResult<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO reward_codes (code, product_id, status, created_at) VALUES (?, ?, 'UNUSED', ?)",
    )
    .bind(code)
    .bind(product_id)
    .bind(now)
    .execute(ex)
    .await?;
    Ok(())
}

/// Atomic compare-and-set on code status.
///
/// Returns true if this caller won the transition, false if the code was
/// not in `expected` state (raced, or never was).
pub async fn transition<'e, E>(
    ex: E,
    code: &str,
    expected: RewardCodeStatus,
    new: RewardCodeStatus,
    owner: Option<i64>,
    now: i64,
) -> RepoResult<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        "UPDATE reward_codes SET status = ?, claimed_by = ?, claimed_at = ? WHERE code = ? AND status = ?",
    )
    .bind(new)
    .bind(owner)
    .bind(now)
    .bind(code)
    .bind(expected)
    .execute(ex)
    .await?;
    Ok(result.rows_affected() == 1)
}

/// Lazily release a stale unauthenticated claim.
///
/// Returns true if the code went back to UNUSED. A no-op for codes that
/// are unused, consumed, or claimed more recently than `cutoff`.
pub async fn release_expired_claim<'e, E>(ex: E, code: &str, cutoff: i64) -> RepoResult<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        "UPDATE reward_codes SET status = 'UNUSED', claimed_by = NULL, claimed_at = NULL WHERE code = ? AND status = 'CLAIMED' AND claimed_at <= ?",
    )
    .bind(code)
    .bind(cutoff)
    .execute(ex)
    .await?;
    Ok(result.rows_affected() == 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::repository::product;
    use shared::models::ProductCreate;
    use shared::util::now_millis;

    async fn seed_code(db: &DbService, code: &str) {
        let now = now_millis();
        let p = product::create(
            &db.pool,
            ProductCreate {
                sku: format!("sku-{code}"),
                name: "Test".into(),
                point_value: 50,
                point_cost: 0,
                redeem_on_scan: false,
            },
            now,
        )
        .await
        .unwrap();
        create(&db.pool, code, p.id, now).await.unwrap();
    }

    #[tokio::test]
    async fn transition_wins_exactly_once() {
        let db = DbService::open_in_memory().await.unwrap();
        seed_code(&db, "ABC123").await;
        let now = now_millis();

        let first = transition(
            &db.pool,
            "ABC123",
            RewardCodeStatus::Unused,
            RewardCodeStatus::Consumed,
            Some(7),
            now,
        )
        .await
        .unwrap();
        assert!(first);

        let second = transition(
            &db.pool,
            "ABC123",
            RewardCodeStatus::Unused,
            RewardCodeStatus::Consumed,
            Some(8),
            now,
        )
        .await
        .unwrap();
        assert!(!second);

        let rc = find_by_code(&db.pool, "ABC123").await.unwrap().unwrap();
        assert_eq!(rc.status, RewardCodeStatus::Consumed);
        assert_eq!(rc.claimed_by, Some(7));
    }

    #[tokio::test]
    async fn expired_claim_is_released_fresh_claim_is_not() {
        let db = DbService::open_in_memory().await.unwrap();
        seed_code(&db, "EXP001").await;
        let now = now_millis();

        assert!(
            transition(
                &db.pool,
                "EXP001",
                RewardCodeStatus::Unused,
                RewardCodeStatus::Claimed,
                None,
                now - 10_000,
            )
            .await
            .unwrap()
        );

        // Claimed 10s ago, cutoff 5s ago → stale, released
        assert!(release_expired_claim(&db.pool, "EXP001", now - 5_000).await.unwrap());
        let rc = find_by_code(&db.pool, "EXP001").await.unwrap().unwrap();
        assert_eq!(rc.status, RewardCodeStatus::Unused);
        assert_eq!(rc.claimed_at, None);

        // Re-claim now; an old cutoff must not release it
        assert!(
            transition(
                &db.pool,
                "EXP001",
                RewardCodeStatus::Unused,
                RewardCodeStatus::Claimed,
                None,
                now,
            )
            .await
            .unwrap()
        );
        assert!(!release_expired_claim(&db.pool, "EXP001", now - 5_000).await.unwrap());
    }
}
