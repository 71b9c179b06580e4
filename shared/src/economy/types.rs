//! Command responses and error codes crossing the API boundary

use super::event::{EconomyEvent, EventPayload};
use serde::{Deserialize, Serialize};

/// Command response - plain structured value; the HTTP mapping (status
/// codes, JSON envelope) is an external collaborator's responsibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResponse {
    /// The command ID this responds to
    pub command_id: String,
    /// Whether the command succeeded
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    /// New order ID (only for redemption commands)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<i64>,
    /// Claim token (only for unauthenticated claims)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claim_token: Option<String>,
    /// Balance after the command, when it moved points
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_balance: Option<i64>,
    /// Error details if failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CommandError>,
}

impl CommandResponse {
    /// Build a success response by scanning the committed events
    pub fn from_events(command_id: String, events: &[EconomyEvent]) -> Self {
        let mut resp = Self {
            command_id,
            success: true,
            user_id: None,
            order_id: None,
            claim_token: None,
            new_balance: None,
            error: None,
        };
        for event in events {
            match &event.payload {
                EventPayload::PointsCredited {
                    user_id,
                    new_balance,
                    ..
                } => {
                    resp.user_id.get_or_insert(*user_id);
                    resp.new_balance = Some(*new_balance);
                }
                EventPayload::PointsDebited {
                    user_id,
                    new_balance,
                    order_id,
                    ..
                } => {
                    resp.user_id.get_or_insert(*user_id);
                    resp.new_balance = Some(*new_balance);
                    resp.order_id = Some(*order_id);
                }
                EventPayload::OrderCreated {
                    order_id, user_id, ..
                } => {
                    resp.user_id.get_or_insert(*user_id);
                    resp.order_id = Some(*order_id);
                }
                EventPayload::CodeClaimed { claim_token, .. } => {
                    resp.claim_token = Some(claim_token.clone());
                }
                EventPayload::UserCreated { user_id, .. } => {
                    resp.user_id = Some(*user_id);
                }
                EventPayload::ProfileUpdated { user_id }
                | EventPayload::CodeConsumed { user_id, .. } => {
                    resp.user_id.get_or_insert(*user_id);
                }
                EventPayload::AchievementUnlocked { .. }
                | EventPayload::ReferralCredited { .. } => {}
            }
        }
        resp
    }

    pub fn error(command_id: String, error: CommandError) -> Self {
        Self {
            command_id,
            success: false,
            user_id: None,
            order_id: None,
            claim_token: None,
            new_balance: None,
            error: Some(error),
        }
    }
}

/// Command error - machine-readable code plus human message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandError {
    pub code: CommandErrorCode,
    pub message: String,
}

impl CommandError {
    pub fn new(code: CommandErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Command error codes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandErrorCode {
    /// A policy rejected the command before the handler ran
    AuthorizationDenied,
    UserNotFound,
    ProductNotFound,
    CodeNotFound,
    /// The code already left the UNUSED state (including CAS losses)
    CodeAlreadyConsumed,
    ClaimTokenNotFound,
    ClaimExpired,
    InsufficientFunds,
    EmailTaken,
    /// Retriable race (stale balance snapshot, write contention)
    Conflict,
    /// Missing handler/policy registration - fatal programming error
    ConfigurationError,
    InternalError,
}

impl CommandErrorCode {
    /// Whether the caller may safely resubmit the same command
    pub fn is_retriable(&self) -> bool {
        matches!(self, CommandErrorCode::Conflict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::economy::event::EconomyEventType;

    #[test]
    fn response_synthesis_picks_up_order_and_balance() {
        let events = vec![
            EconomyEvent::new(
                "cmd-1".into(),
                EconomyEventType::OrderCreated,
                EventPayload::OrderCreated {
                    order_id: 7,
                    user_id: 3,
                    product_id: 9,
                    cost_in_points: 60,
                },
            ),
            EconomyEvent::new(
                "cmd-1".into(),
                EconomyEventType::PointsDebited,
                EventPayload::PointsDebited {
                    user_id: 3,
                    points: 60,
                    new_balance: 40,
                    order_id: 7,
                },
            ),
        ];
        let resp = CommandResponse::from_events("cmd-1".into(), &events);
        assert!(resp.success);
        assert_eq!(resp.user_id, Some(3));
        assert_eq!(resp.order_id, Some(7));
        assert_eq!(resp.new_balance, Some(40));
        assert!(resp.claim_token.is_none());
    }

    #[test]
    fn only_conflict_is_retriable() {
        assert!(CommandErrorCode::Conflict.is_retriable());
        assert!(!CommandErrorCode::CodeAlreadyConsumed.is_retriable());
        assert!(!CommandErrorCode::InsufficientFunds.is_retriable());
    }
}
