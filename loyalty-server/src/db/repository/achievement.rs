//! Achievement Repository

use super::RepoResult;
use shared::models::{Achievement, AchievementCriteria, AchievementUnlock};
use shared::util::snowflake_id;
use sqlx::{Executor, Sqlite};

pub async fn create<'e, E>(
    ex: E,
    name: &str,
    description: Option<&str>,
    criteria_type: AchievementCriteria,
    threshold: i64,
    bonus_points: i64,
) -> RepoResult<Achievement>
where
    E: Executor<'e, Database = Sqlite>,
{
    let id = snowflake_id();
    sqlx::query(
        "INSERT INTO achievements (id, name, description, criteria_type, threshold, bonus_points, is_active) VALUES (?, ?, ?, ?, ?, ?, 1)",
    )
    .bind(id)
    .bind(name)
    .bind(description)
    .bind(criteria_type)
    .bind(threshold)
    .bind(bonus_points)
    .execute(ex)
    .await?;

    Ok(Achievement {
        id,
        name: name.to_string(),
        description: description.map(str::to_string),
        criteria_type,
        threshold,
        bonus_points,
        is_active: true,
    })
}

pub async fn list_active<'e, E>(ex: E) -> RepoResult<Vec<Achievement>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query_as::<_, Achievement>(
        "SELECT id, name, description, criteria_type, threshold, bonus_points, is_active FROM achievements WHERE is_active = 1",
    )
    .fetch_all(ex)
    .await?;
    Ok(rows)
}

/// Record an unlock. Returns true only for the first unlock of this
/// (achievement, user) pair — the INSERT OR IGNORE makes re-evaluation
/// idempotent.
pub async fn record_unlock<'e, E>(
    ex: E,
    achievement_id: i64,
    user_id: i64,
    now: i64,
) -> RepoResult<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        "INSERT OR IGNORE INTO achievement_unlocks (achievement_id, user_id, unlocked_at) VALUES (?, ?, ?)",
    )
    .bind(achievement_id)
    .bind(user_id)
    .bind(now)
    .execute(ex)
    .await?;
    Ok(result.rows_affected() == 1)
}

pub async fn unlocks_for_user<'e, E>(ex: E, user_id: i64) -> RepoResult<Vec<AchievementUnlock>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query_as::<_, AchievementUnlock>(
        "SELECT achievement_id, user_id, unlocked_at FROM achievement_unlocks WHERE user_id = ? ORDER BY unlocked_at",
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
    use crate::db::repository::user;
    use shared::util::now_millis;

    #[tokio::test]
    async fn record_unlock_is_idempotent() {
        let db = DbService::open_in_memory().await.unwrap();
        let now = now_millis();
        user::create(&db.pool, 1, "u@example.com", "U", "CODEU", None, now)
            .await
            .unwrap();
        let a = create(&db.pool, "First Scan", None, AchievementCriteria::ScanCount, 1, 10)
            .await
            .unwrap();

        assert!(record_unlock(&db.pool, a.id, 1, now).await.unwrap());
        assert!(!record_unlock(&db.pool, a.id, 1, now + 1).await.unwrap());
        assert_eq!(unlocks_for_user(&db.pool, 1).await.unwrap().len(), 1);
    }
}
