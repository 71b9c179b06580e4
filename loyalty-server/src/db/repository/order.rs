//! Order Repository

use super::RepoResult;
use shared::models::{Order, OrderStatus};
use sqlx::{Executor, Sqlite};

pub async fn create<'e, E>(
    ex: E,
    id: i64,
    user_id: i64,
    product_id: i64,
    cost_in_points: i64,
    now: i64,
) -> RepoResult<Order>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO orders (id, user_id, product_id, cost_in_points, status, created_at) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(user_id)
    .bind(product_id)
    .bind(cost_in_points)
    .bind(OrderStatus::Completed)
    .bind(now)
    .execute(ex)
    .await?;

    Ok(Order {
        id,
        user_id,
        product_id,
        cost_in_points,
        status: OrderStatus::Completed,
        created_at: now,
    })
}

pub async fn find<'e, E>(ex: E, id: i64) -> RepoResult<Option<Order>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query_as::<_, Order>(
        "SELECT id, user_id, product_id, cost_in_points, status, created_at FROM orders WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(ex)
    .await?;
    Ok(row)
}

pub async fn list_for_user<'e, E>(ex: E, user_id: i64) -> RepoResult<Vec<Order>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query_as::<_, Order>(
        "SELECT id, user_id, product_id, cost_in_points, status, created_at FROM orders WHERE user_id = ? ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(ex)
    .await?;
    Ok(rows)
}
