//! User Repository

use super::RepoResult;
use shared::models::User;
use sqlx::{Executor, Sqlite};

pub async fn find<'e, E>(ex: E, id: i64) -> RepoResult<Option<User>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query_as::<_, User>(
        "SELECT id, email, display_name, referral_code, referred_by, is_active, created_at, updated_at FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(ex)
    .await?;
    Ok(row)
}

pub async fn find_by_email<'e, E>(ex: E, email: &str) -> RepoResult<Option<User>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query_as::<_, User>(
        "SELECT id, email, display_name, referral_code, referred_by, is_active, created_at, updated_at FROM users WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(ex)
    .await?;
    Ok(row)
}

pub async fn find_by_referral_code<'e, E>(ex: E, code: &str) -> RepoResult<Option<User>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query_as::<_, User>(
        "SELECT id, email, display_name, referral_code, referred_by, is_active, created_at, updated_at FROM users WHERE referral_code = ?",
    )
    .bind(code)
    .fetch_optional(ex)
    .await?;
    Ok(row)
}

#[allow(clippy::too_many_arguments)]
pub async fn create<'e, E>(
    ex: E,
    id: i64,
    email: &str,
    display_name: &str,
    referral_code: &str,
    referred_by: Option<i64>,
    now: i64,
) -> RepoResult<User>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO users (id, email, display_name, referral_code, referred_by, is_active, created_at, updated_at) VALUES (?, ?, ?, ?, ?, 1, ?, ?)",
    )
    .bind(id)
    .bind(email)
    .bind(display_name)
    .bind(referral_code)
    .bind(referred_by)
    .bind(now)
    .bind(now)
    .execute(ex)
    .await?;

    Ok(User {
        id,
        email: email.to_string(),
        display_name: display_name.to_string(),
        referral_code: referral_code.to_string(),
        referred_by,
        is_active: true,
        created_at: now,
        updated_at: now,
    })
}

pub async fn update_display_name<'e, E>(ex: E, id: i64, display_name: &str, now: i64) -> RepoResult<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("UPDATE users SET display_name = ?, updated_at = ? WHERE id = ?")
        .bind(display_name)
        .bind(now)
        .bind(id)
        .execute(ex)
        .await?;
    Ok(result.rows_affected() == 1)
}

/// Upsert one profile metadata key
pub async fn update_meta<'e, E>(ex: E, user_id: i64, key: &str, value: &str, now: i64) -> RepoResult<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO user_meta (user_id, key, value, updated_at) VALUES (?, ?, ?, ?) ON CONFLICT (user_id, key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
    )
    .bind(user_id)
    .bind(key)
    .bind(value)
    .bind(now)
    .execute(ex)
    .await?;
    Ok(())
}

pub async fn get_meta<'e, E>(ex: E, user_id: i64, key: &str) -> RepoResult<Option<String>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row: Option<(String,)> =
        sqlx::query_as("SELECT value FROM user_meta WHERE user_id = ? AND key = ?")
            .bind(user_id)
            .bind(key)
            .fetch_optional(ex)
            .await?;
    Ok(row.map(|(v,)| v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use shared::util::{now_millis, snowflake_id};

    #[tokio::test]
    async fn create_and_find_roundtrip() {
        let db = DbService::open_in_memory().await.unwrap();
        let id = snowflake_id();
        let now = now_millis();
        create(&db.pool, id, "a@example.com", "Ana", "REFCODE1", None, now)
            .await
            .unwrap();

        let found = find(&db.pool, id).await.unwrap().unwrap();
        assert_eq!(found.email, "a@example.com");
        assert_eq!(found.referred_by, None);
        assert!(found.is_active);

        let by_code = find_by_referral_code(&db.pool, "REFCODE1").await.unwrap();
        assert_eq!(by_code.unwrap().id, id);
    }

    #[tokio::test]
    async fn duplicate_email_is_reported() {
        let db = DbService::open_in_memory().await.unwrap();
        let now = now_millis();
        create(&db.pool, 1, "dup@example.com", "A", "CODEA", None, now)
            .await
            .unwrap();
        let err = create(&db.pool, 2, "dup@example.com", "B", "CODEB", None, now)
            .await
            .unwrap_err();
        assert!(matches!(err, crate::db::repository::RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn meta_upsert_overwrites() {
        let db = DbService::open_in_memory().await.unwrap();
        let now = now_millis();
        create(&db.pool, 5, "m@example.com", "M", "CODEM", None, now)
            .await
            .unwrap();
        update_meta(&db.pool, 5, "locale", "es", now).await.unwrap();
        update_meta(&db.pool, 5, "locale", "en", now + 1).await.unwrap();
        let value = get_meta(&db.pool, 5, "locale").await.unwrap();
        assert_eq!(value.as_deref(), Some("en"));
    }
}
