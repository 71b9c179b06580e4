//! Achievement Model

use serde::{Deserialize, Serialize};

/// Achievement criteria kinds, evaluated against ledger-derived stats
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum AchievementCriteria {
    /// Lifetime credited points reach the threshold
    TotalPoints,
    /// Number of product scans reaches the threshold
    ScanCount,
    /// Number of redemptions reaches the threshold
    RedemptionCount,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Achievement {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub criteria_type: AchievementCriteria,
    pub threshold: i64,
    /// Zero-or-positive points credited on unlock
    pub bonus_points: i64,
    pub is_active: bool,
}

/// One row per (achievement, user) — the uniqueness constraint is what
/// makes unlocking idempotent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct AchievementUnlock {
    pub achievement_id: i64,
    pub user_id: i64,
    pub unlocked_at: i64,
}
