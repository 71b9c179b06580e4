//! Rank Model
//!
//! Ranks derive from lifetime credited points. They are never stored;
//! the server caches the derivation and invalidates on ledger writes.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rank {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl Rank {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rank::Bronze => "BRONZE",
            Rank::Silver => "SILVER",
            Rank::Gold => "GOLD",
            Rank::Platinum => "PLATINUM",
        }
    }

    /// Derive a rank from lifetime credited points
    pub fn from_lifetime_points(points: i64, thresholds: &RankThresholds) -> Self {
        if points >= thresholds.platinum {
            Rank::Platinum
        } else if points >= thresholds.gold {
            Rank::Gold
        } else if points >= thresholds.silver {
            Rank::Silver
        } else {
            Rank::Bronze
        }
    }
}

/// Lifetime-point thresholds per rank (bronze is the floor)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankThresholds {
    pub silver: i64,
    pub gold: i64,
    pub platinum: i64,
}

impl Default for RankThresholds {
    fn default() -> Self {
        Self {
            silver: 500,
            gold: 2_000,
            platinum: 10_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_derivation_respects_thresholds() {
        let t = RankThresholds::default();
        assert_eq!(Rank::from_lifetime_points(0, &t), Rank::Bronze);
        assert_eq!(Rank::from_lifetime_points(499, &t), Rank::Bronze);
        assert_eq!(Rank::from_lifetime_points(500, &t), Rank::Silver);
        assert_eq!(Rank::from_lifetime_points(2_000, &t), Rank::Gold);
        assert_eq!(Rank::from_lifetime_points(10_000, &t), Rank::Platinum);
    }
}
