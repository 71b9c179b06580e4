//! Reward Code Model

use serde::{Deserialize, Serialize};

/// Reward code status — valid transitions are UNUSED→CLAIMED→CONSUMED
/// and UNUSED→CONSUMED (authenticated scan), each exactly once.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum RewardCodeStatus {
    Unused,
    /// Reserved by an unauthenticated claim, pending registration
    Claimed,
    Consumed,
}

/// Single-use token printed on a product
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct RewardCode {
    pub code: String,
    pub product_id: i64,
    pub status: RewardCodeStatus,
    pub claimed_by: Option<i64>,
    pub claimed_at: Option<i64>,
    pub created_at: i64,
}
