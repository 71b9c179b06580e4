//! Economy commands - requests from clients to mutate economy state

use crate::models::{NewUserProfile, ProfileChanges};
use crate::util::now_millis;
use serde::{Deserialize, Serialize};

/// Economy command - immutable description of one requested state change
///
/// Created per request, dispatched to exactly one handler, discarded after
/// dispatch. Owns no persistent state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EconomyCommand {
    /// Unique command ID (uuid v4), recorded on ledger entries for audit
    /// tracing and caller-side idempotency checks after timeouts
    pub command_id: String,
    /// Client timestamp (Unix milliseconds); server time is authoritative
    pub timestamp: i64,
    pub payload: EconomyCommandPayload,
}

impl EconomyCommand {
    pub fn new(payload: EconomyCommandPayload) -> Self {
        Self {
            command_id: uuid::Uuid::new_v4().to_string(),
            timestamp: now_millis(),
            payload,
        }
    }

    /// The command's kind, used as the policy-registry key
    pub fn kind(&self) -> CommandKind {
        match &self.payload {
            EconomyCommandPayload::RedeemReward { .. } => CommandKind::RedeemReward,
            EconomyCommandPayload::ProcessProductScan { .. } => CommandKind::ProcessProductScan,
            EconomyCommandPayload::ProcessUnauthenticatedClaim { .. } => {
                CommandKind::ProcessUnauthenticatedClaim
            }
            EconomyCommandPayload::RegisterWithToken { .. } => CommandKind::RegisterWithToken,
            EconomyCommandPayload::CreateUser { .. } => CommandKind::CreateUser,
            EconomyCommandPayload::UpdateProfile { .. } => CommandKind::UpdateProfile,
        }
    }

    /// The subject user, for context building (None for commands that run
    /// before any user exists)
    pub fn subject_user(&self) -> Option<i64> {
        match &self.payload {
            EconomyCommandPayload::RedeemReward { user_id, .. }
            | EconomyCommandPayload::ProcessProductScan { user_id, .. }
            | EconomyCommandPayload::UpdateProfile { user_id, .. } => Some(*user_id),
            EconomyCommandPayload::ProcessUnauthenticatedClaim { .. }
            | EconomyCommandPayload::RegisterWithToken { .. }
            | EconomyCommandPayload::CreateUser { .. } => None,
        }
    }
}

/// Command payload variants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EconomyCommandPayload {
    /// Spend points on a reward product
    RedeemReward { user_id: i64, product_id: i64 },
    /// Credit points for a scanned product code
    ProcessProductScan { user_id: i64, code: String },
    /// Reserve a code before registration; returns a claim token
    ProcessUnauthenticatedClaim { code: String },
    /// Create a user, then credit the code bound to the claim token
    RegisterWithToken {
        claim_token: String,
        profile: NewUserProfile,
    },
    /// Create a user (no pending claim)
    CreateUser { profile: NewUserProfile },
    /// Update mutable profile fields and key/value metadata
    UpdateProfile {
        user_id: i64,
        changes: ProfileChanges,
    },
}

/// Command kind - fixed set, known at build time
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandKind {
    RedeemReward,
    ProcessProductScan,
    ProcessUnauthenticatedClaim,
    RegisterWithToken,
    CreateUser,
    UpdateProfile,
}

impl std::fmt::Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CommandKind::RedeemReward => "REDEEM_REWARD",
            CommandKind::ProcessProductScan => "PROCESS_PRODUCT_SCAN",
            CommandKind::ProcessUnauthenticatedClaim => "PROCESS_UNAUTHENTICATED_CLAIM",
            CommandKind::RegisterWithToken => "REGISTER_WITH_TOKEN",
            CommandKind::CreateUser => "CREATE_USER",
            CommandKind::UpdateProfile => "UPDATE_PROFILE",
        };
        write!(f, "{s}")
    }
}
