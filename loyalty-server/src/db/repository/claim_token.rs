//! Claim Token Repository

use super::RepoResult;
use shared::models::ClaimToken;
use sqlx::{Executor, Sqlite};

pub async fn create<'e, E>(
    ex: E,
    token: &str,
    code: &str,
    now: i64,
    expires_at: i64,
) -> RepoResult<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO claim_tokens (token, code, created_at, expires_at) VALUES (?, ?, ?, ?)",
    )
    .bind(token)
    .bind(code)
    .bind(now)
    .bind(expires_at)
    .execute(ex)
    .await?;
    Ok(())
}

pub async fn find<'e, E>(ex: E, token: &str) -> RepoResult<Option<ClaimToken>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query_as::<_, ClaimToken>(
        "SELECT token, code, created_at, expires_at, registered_user_id, consumed_at FROM claim_tokens WHERE token = ?",
    )
    .bind(token)
    .fetch_optional(ex)
    .await?;
    Ok(row)
}

/// Bind the token to the user it created. Conditional on being unbound so
/// a racing duplicate registration cannot rebind it.
pub async fn bind_user<'e, E>(ex: E, token: &str, user_id: i64) -> RepoResult<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        "UPDATE claim_tokens SET registered_user_id = ? WHERE token = ? AND registered_user_id IS NULL",
    )
    .bind(user_id)
    .bind(token)
    .execute(ex)
    .await?;
    Ok(result.rows_affected() == 1)
}

pub async fn mark_consumed<'e, E>(ex: E, token: &str, now: i64) -> RepoResult<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        "UPDATE claim_tokens SET consumed_at = ? WHERE token = ? AND consumed_at IS NULL",
    )
    .bind(now)
    .bind(token)
    .execute(ex)
    .await?;
    Ok(result.rows_affected() == 1)
}
