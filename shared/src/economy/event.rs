//! Economy events - immutable facts broadcast after command processing

use crate::util::now_millis;
use serde::{Deserialize, Serialize};

/// Economy event - broadcast on the in-process bus after commit.
///
/// Delivery is synchronous, best-effort: a failing listener never rolls
/// back the already-committed state change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EconomyEvent {
    /// Event unique ID
    pub event_id: String,
    /// Server timestamp (Unix milliseconds)
    pub timestamp: i64,
    /// Command that produced this event (for audit tracing)
    pub command_id: String,
    /// Event type
    pub event_type: EconomyEventType,
    /// Event payload - flat primitive fields only
    pub payload: EventPayload,
}

impl EconomyEvent {
    pub fn new(command_id: String, event_type: EconomyEventType, payload: EventPayload) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            timestamp: now_millis(),
            command_id,
            event_type,
            payload,
        }
    }

    /// The user whose balance or profile this event concerns, if any
    pub fn subject_user(&self) -> Option<i64> {
        match &self.payload {
            EventPayload::PointsCredited { user_id, .. }
            | EventPayload::PointsDebited { user_id, .. }
            | EventPayload::CodeConsumed { user_id, .. }
            | EventPayload::OrderCreated { user_id, .. }
            | EventPayload::UserCreated { user_id, .. }
            | EventPayload::ProfileUpdated { user_id }
            | EventPayload::AchievementUnlocked { user_id, .. } => Some(*user_id),
            EventPayload::CodeClaimed { .. } => None,
            EventPayload::ReferralCredited { referee_id, .. } => Some(*referee_id),
        }
    }
}

/// Event type enumeration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EconomyEventType {
    PointsCredited,
    PointsDebited,
    CodeClaimed,
    CodeConsumed,
    OrderCreated,
    UserCreated,
    ProfileUpdated,
    AchievementUnlocked,
    ReferralCredited,
}

impl std::fmt::Display for EconomyEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EconomyEventType::PointsCredited => write!(f, "POINTS_CREDITED"),
            EconomyEventType::PointsDebited => write!(f, "POINTS_DEBITED"),
            EconomyEventType::CodeClaimed => write!(f, "CODE_CLAIMED"),
            EconomyEventType::CodeConsumed => write!(f, "CODE_CONSUMED"),
            EconomyEventType::OrderCreated => write!(f, "ORDER_CREATED"),
            EconomyEventType::UserCreated => write!(f, "USER_CREATED"),
            EconomyEventType::ProfileUpdated => write!(f, "PROFILE_UPDATED"),
            EconomyEventType::AchievementUnlocked => write!(f, "ACHIEVEMENT_UNLOCKED"),
            EconomyEventType::ReferralCredited => write!(f, "REFERRAL_CREDITED"),
        }
    }
}

/// Event payload variants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventPayload {
    PointsCredited {
        user_id: i64,
        points: i64,
        new_balance: i64,
        /// Originating action type ("PRODUCT_SCAN", "REFERRAL_BONUS_...", ...)
        action: String,
    },
    PointsDebited {
        user_id: i64,
        points: i64,
        new_balance: i64,
        order_id: i64,
    },
    CodeClaimed {
        code: String,
        product_id: i64,
        claim_token: String,
        expires_at: i64,
    },
    CodeConsumed {
        code: String,
        product_id: i64,
        user_id: i64,
    },
    OrderCreated {
        order_id: i64,
        user_id: i64,
        product_id: i64,
        cost_in_points: i64,
    },
    UserCreated {
        user_id: i64,
        email: String,
        referral_code: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        referred_by: Option<i64>,
    },
    ProfileUpdated {
        user_id: i64,
    },
    AchievementUnlocked {
        user_id: i64,
        achievement_id: i64,
        bonus_points: i64,
    },
    ReferralCredited {
        referrer_id: i64,
        referee_id: i64,
        referrer_bonus: i64,
        referee_bonus: i64,
    },
}
