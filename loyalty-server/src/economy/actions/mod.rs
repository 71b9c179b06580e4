//! Command action implementations
//!
//! Each action implements the `CommandHandler` trait and handles one
//! specific command type.

use async_trait::async_trait;

use crate::economy::error::EconomyError;
use crate::economy::traits::{CommandContext, CommandHandler};
use shared::economy::{EconomyCommand, EconomyCommandPayload, EconomyEvent};

mod claim_code;
mod create_user;
mod product_scan;
mod redeem_reward;
mod update_profile;

pub use claim_code::ClaimCodeAction;
pub use create_user::CreateUserAction;
pub use product_scan::ProcessProductScanAction;
pub use redeem_reward::RedeemRewardAction;
pub use update_profile::UpdateProfileAction;

/// CommandAction enum - dispatches to concrete action implementations
pub enum CommandAction {
    RedeemReward(RedeemRewardAction),
    ProcessProductScan(ProcessProductScanAction),
    ClaimCode(ClaimCodeAction),
    CreateUser(CreateUserAction),
    UpdateProfile(UpdateProfileAction),
}

#[async_trait]
impl CommandHandler for CommandAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
    ) -> Result<Vec<EconomyEvent>, EconomyError> {
        match self {
            CommandAction::RedeemReward(action) => action.execute(ctx).await,
            CommandAction::ProcessProductScan(action) => action.execute(ctx).await,
            CommandAction::ClaimCode(action) => action.execute(ctx).await,
            CommandAction::CreateUser(action) => action.execute(ctx).await,
            CommandAction::UpdateProfile(action) => action.execute(ctx).await,
        }
    }
}

/// Convert EconomyCommand to CommandAction
///
/// This is the ONLY place with a match on EconomyCommandPayload.
impl From<&EconomyCommand> for CommandAction {
    fn from(cmd: &EconomyCommand) -> Self {
        match &cmd.payload {
            EconomyCommandPayload::RedeemReward { user_id, product_id } => {
                CommandAction::RedeemReward(RedeemRewardAction {
                    user_id: *user_id,
                    product_id: *product_id,
                })
            }
            EconomyCommandPayload::ProcessProductScan { user_id, code } => {
                CommandAction::ProcessProductScan(ProcessProductScanAction {
                    user_id: *user_id,
                    code: code.clone(),
                })
            }
            EconomyCommandPayload::ProcessUnauthenticatedClaim { code } => {
                CommandAction::ClaimCode(ClaimCodeAction { code: code.clone() })
            }
            EconomyCommandPayload::CreateUser { profile } => {
                CommandAction::CreateUser(CreateUserAction {
                    profile: profile.clone(),
                })
            }
            EconomyCommandPayload::UpdateProfile { user_id, changes } => {
                CommandAction::UpdateProfile(UpdateProfileAction {
                    user_id: *user_id,
                    changes: changes.clone(),
                })
            }
            EconomyCommandPayload::RegisterWithToken { .. } => {
                // RegisterWithToken is two-phase and owned by UserService;
                // EconomyService rejects it before reaching this conversion.
                unreachable!("RegisterWithToken is dispatched via UserService")
            }
        }
    }
}
