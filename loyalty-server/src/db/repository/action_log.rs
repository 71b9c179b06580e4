//! Action Log Repository — the points ledger
//!
//! Append-only. Balance is always computed from entries; no cached
//! balance column exists to drift out of sync.

use super::RepoResult;
use shared::models::{ActionLogEntry, ActionType};
use sqlx::{Executor, Sqlite};

/// Append one ledger entry, returning its id
pub async fn append<'e, E>(
    ex: E,
    user_id: i64,
    action_type: ActionType,
    points_delta: i64,
    metadata: Option<String>,
    command_id: Option<&str>,
    timestamp: i64,
) -> RepoResult<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        "INSERT INTO action_log (user_id, action_type, points_delta, metadata, command_id, timestamp) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(user_id)
    .bind(action_type)
    .bind(points_delta)
    .bind(metadata)
    .bind(command_id)
    .bind(timestamp)
    .execute(ex)
    .await?;
    Ok(result.last_insert_rowid())
}

/// Current balance: sum of all deltas for the user
pub async fn sum_points_for_user<'e, E>(ex: E, user_id: i64) -> RepoResult<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sum: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(points_delta), 0) FROM action_log WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_one(ex)
    .await?;
    Ok(sum)
}

/// Lifetime credited points: sum of positive deltas only (rank input)
pub async fn lifetime_points<'e, E>(ex: E, user_id: i64) -> RepoResult<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let sum: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(points_delta), 0) FROM action_log WHERE user_id = ? AND points_delta > 0",
    )
    .bind(user_id)
    .fetch_one(ex)
    .await?;
    Ok(sum)
}

pub async fn count_for_user<'e, E>(ex: E, user_id: i64, action_type: ActionType) -> RepoResult<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM action_log WHERE user_id = ? AND action_type = ?",
    )
    .bind(user_id)
    .bind(action_type)
    .fetch_one(ex)
    .await?;
    Ok(count)
}

pub async fn has_entry<'e, E>(ex: E, user_id: i64, action_type: ActionType) -> RepoResult<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    Ok(count_for_user(ex, user_id, action_type).await? > 0)
}

pub async fn entries_for_user<'e, E>(ex: E, user_id: i64) -> RepoResult<Vec<ActionLogEntry>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query_as::<_, ActionLogEntry>(
        "SELECT id, user_id, action_type, points_delta, metadata, command_id, timestamp FROM action_log WHERE user_id = ? ORDER BY id",
    )
    .bind(user_id)
    .fetch_all(ex)
    .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use shared::util::now_millis;

    #[tokio::test]
    async fn balance_is_sum_of_deltas() {
        let db = DbService::open_in_memory().await.unwrap();
        let now = now_millis();
        append(&db.pool, 1, ActionType::ProductScan, 50, None, None, now)
            .await
            .unwrap();
        append(&db.pool, 1, ActionType::ProductScan, 30, None, None, now)
            .await
            .unwrap();
        append(&db.pool, 1, ActionType::Redemption, -60, None, None, now)
            .await
            .unwrap();
        // Another user's entries must not leak in
        append(&db.pool, 2, ActionType::ProductScan, 999, None, None, now)
            .await
            .unwrap();

        assert_eq!(sum_points_for_user(&db.pool, 1).await.unwrap(), 20);
        assert_eq!(lifetime_points(&db.pool, 1).await.unwrap(), 80);
        assert_eq!(
            count_for_user(&db.pool, 1, ActionType::ProductScan).await.unwrap(),
            2
        );
    }

    #[tokio::test]
    async fn entries_preserve_order_and_metadata() {
        let db = DbService::open_in_memory().await.unwrap();
        let now = now_millis();
        append(
            &db.pool,
            3,
            ActionType::ProductScan,
            10,
            Some(r#"{"code":"ABC"}"#.into()),
            Some("cmd-1"),
            now,
        )
        .await
        .unwrap();
        append(&db.pool, 3, ActionType::Redemption, -5, None, Some("cmd-2"), now)
            .await
            .unwrap();

        let entries = entries_for_user(&db.pool, 3).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].command_id.as_deref(), Some("cmd-1"));
        assert_eq!(entries[0].metadata.as_deref(), Some(r#"{"code":"ABC"}"#));
        assert_eq!(entries[1].points_delta, -5);
    }
}
