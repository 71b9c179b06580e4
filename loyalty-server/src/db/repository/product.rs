//! Product Repository

use super::RepoResult;
use shared::models::{Product, ProductCreate};
use shared::util::snowflake_id;
use sqlx::{Executor, Sqlite};

pub async fn find<'e, E>(ex: E, id: i64) -> RepoResult<Option<Product>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query_as::<_, Product>(
        "SELECT id, sku, name, point_value, point_cost, redeem_on_scan, is_active, created_at FROM products WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(ex)
    .await?;
    Ok(row)
}

pub async fn find_by_sku<'e, E>(ex: E, sku: &str) -> RepoResult<Option<Product>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query_as::<_, Product>(
        "SELECT id, sku, name, point_value, point_cost, redeem_on_scan, is_active, created_at FROM products WHERE sku = ?",
    )
    .bind(sku)
    .fetch_optional(ex)
    .await?;
    Ok(row)
}

pub async fn create<'e, E>(ex: E, data: ProductCreate, now: i64) -> RepoResult<Product>
where
    E: Executor<'e, Database = Sqlite>,
{
    let id = snowflake_id();
    sqlx::query(
        "INSERT INTO products (id, sku, name, point_value, point_cost, redeem_on_scan, is_active, created_at) VALUES (?, ?, ?, ?, ?, ?, 1, ?)",
    )
    .bind(id)
    .bind(&data.sku)
    .bind(&data.name)
    .bind(data.point_value)
    .bind(data.point_cost)
    .bind(data.redeem_on_scan)
    .bind(now)
    .execute(ex)
    .await?;

    Ok(Product {
        id,
        sku: data.sku,
        name: data.name,
        point_value: data.point_value,
        point_cost: data.point_cost,
        redeem_on_scan: data.redeem_on_scan,
        is_active: true,
        created_at: now,
    })
}
