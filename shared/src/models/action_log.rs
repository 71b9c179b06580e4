//! Action Log Model — the points ledger

use serde::{Deserialize, Serialize};

/// Point-affecting action types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum ActionType {
    /// Positive credit for scanning a product code
    ProductScan,
    /// Negative debit for redeeming a reward
    Redemption,
    /// Bonus credited to the referrer on a referee's registration
    ReferralBonusReferrer,
    /// Bonus credited to the referee on their own registration
    ReferralBonusReferee,
    /// Zero-or-positive bonus on achievement unlock
    AchievementBonus,
    /// Manual correction — offsetting entry, never an update in place
    Adjustment,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::ProductScan => "PRODUCT_SCAN",
            ActionType::Redemption => "REDEMPTION",
            ActionType::ReferralBonusReferrer => "REFERRAL_BONUS_REFERRER",
            ActionType::ReferralBonusReferee => "REFERRAL_BONUS_REFEREE",
            ActionType::AchievementBonus => "ACHIEVEMENT_BONUS",
            ActionType::Adjustment => "ADJUSTMENT",
        }
    }
}

/// Immutable ledger record
///
/// Append-only: no entry is ever updated or deleted. A user's balance is
/// the sum of their entries' `points_delta`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ActionLogEntry {
    pub id: i64,
    pub user_id: i64,
    pub action_type: ActionType,
    pub points_delta: i64,
    /// JSON metadata (code, order id, referee id, ...)
    pub metadata: Option<String>,
    /// Command that produced this entry, for audit tracing and caller-side
    /// idempotency checks after a timeout
    pub command_id: Option<String>,
    pub timestamp: i64,
}
