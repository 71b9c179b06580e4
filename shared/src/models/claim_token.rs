//! Claim Token Model

use serde::{Deserialize, Serialize};

/// Short-lived token binding an unauthenticated claim to a reward code.
///
/// `registered_user_id` is set in the same transaction that creates the
/// user during RegisterWithToken, so a retried registration finds the
/// existing user instead of creating a second one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ClaimToken {
    pub token: String,
    pub code: String,
    pub created_at: i64,
    pub expires_at: i64,
    pub registered_user_id: Option<i64>,
    pub consumed_at: Option<i64>,
}

impl ClaimToken {
    pub fn is_expired(&self, now: i64) -> bool {
        now >= self.expires_at
    }
}
