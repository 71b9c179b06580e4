//! User Model

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// User entity
///
/// The point balance is NOT stored here — it is derived from the action
/// log, which is the sole source of truth for balances. `referred_by` is
/// set once at creation and never changes afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub email: String,
    pub display_name: String,
    /// This user's own referral code, handed out to others
    pub referral_code: String,
    /// The user who referred this one (immutable after creation)
    pub referred_by: Option<i64>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Profile data for creating a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUserProfile {
    pub email: String,
    pub display_name: String,
    /// Referral code of the referring user, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referral_code: Option<String>,
}

/// Mutable profile fields for UpdateProfile
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Free-form key/value metadata, upserted per key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<HashMap<String, String>>,
}
