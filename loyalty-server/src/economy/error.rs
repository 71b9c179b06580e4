use crate::db::repository::RepoError;
use crate::economy::policy::{CanAffordRedemption, Policy};
use shared::economy::{CommandError, CommandErrorCode};
use thiserror::Error;

/// Economy engine errors
#[derive(Debug, Error)]
pub enum EconomyError {
    #[error("policy denied: {policy}")]
    AuthorizationDenied { policy: &'static str },

    #[error("user not found: {0}")]
    UserNotFound(i64),

    #[error("product not found: {0}")]
    ProductNotFound(i64),

    #[error("reward code not found: {0}")]
    CodeNotFound(String),

    #[error("reward code already used: {0}")]
    CodeAlreadyConsumed(String),

    #[error("unknown referral code: {0}")]
    ReferralCodeUnknown(String),

    #[error("claim token not found")]
    ClaimTokenNotFound,

    #[error("claim token expired")]
    ClaimExpired,

    #[error("insufficient funds: need {required}, have {balance}")]
    InsufficientFunds { required: i64, balance: i64 },

    #[error("email already registered: {0}")]
    EmailTaken(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("storage error: {0}")]
    Repo(#[from] RepoError),
}

/// 将存储错误转换为错误码（写冲突可重试，其余为内部错误）
fn classify_repo_error(e: &RepoError) -> CommandErrorCode {
    match e {
        RepoError::Busy => CommandErrorCode::Conflict,
        RepoError::Duplicate(_) => CommandErrorCode::Conflict,
        RepoError::NotFound(_) | RepoError::Database(_) => CommandErrorCode::InternalError,
    }
}

impl From<EconomyError> for CommandError {
    fn from(err: EconomyError) -> Self {
        let (code, message) = match err {
            EconomyError::AuthorizationDenied { policy } => {
                // An affordability rejection carries the same code no
                // matter which layer caught it: snapshot gate here, or
                // the in-tx re-check inside the redeem handler.
                let code = if policy == CanAffordRedemption.name() {
                    CommandErrorCode::InsufficientFunds
                } else {
                    CommandErrorCode::AuthorizationDenied
                };
                (code, format!("Denied by policy: {policy}"))
            }
            EconomyError::UserNotFound(id) => {
                (CommandErrorCode::UserNotFound, format!("User not found: {id}"))
            }
            EconomyError::ProductNotFound(id) => (
                CommandErrorCode::ProductNotFound,
                format!("Product not found: {id}"),
            ),
            EconomyError::CodeNotFound(code) => (
                CommandErrorCode::CodeNotFound,
                format!("Reward code not found: {code}"),
            ),
            EconomyError::CodeAlreadyConsumed(code) => (
                CommandErrorCode::CodeAlreadyConsumed,
                format!("Reward code already used: {code}"),
            ),
            EconomyError::ReferralCodeUnknown(code) => (
                CommandErrorCode::UserNotFound,
                format!("Unknown referral code: {code}"),
            ),
            EconomyError::ClaimTokenNotFound => (
                CommandErrorCode::ClaimTokenNotFound,
                "Claim token not found".to_string(),
            ),
            EconomyError::ClaimExpired => {
                (CommandErrorCode::ClaimExpired, "Claim token expired".to_string())
            }
            EconomyError::InsufficientFunds { required, balance } => (
                CommandErrorCode::InsufficientFunds,
                format!("Insufficient funds: need {required}, have {balance}"),
            ),
            EconomyError::EmailTaken(email) => (
                CommandErrorCode::EmailTaken,
                format!("Email already registered: {email}"),
            ),
            EconomyError::Conflict(msg) => (CommandErrorCode::Conflict, msg),
            EconomyError::Configuration(msg) => {
                tracing::error!(error = %msg, "Configuration error in command dispatch");
                (CommandErrorCode::ConfigurationError, msg)
            }
            EconomyError::Repo(e) => {
                let code = classify_repo_error(&e);
                // 保留技术细节用于日志，不泄露给调用方
                tracing::error!(error = %e, error_code = ?code, "Storage error during command");
                let message = match code {
                    CommandErrorCode::Conflict => "Write conflict, please retry".to_string(),
                    _ => "Internal storage error".to_string(),
                };
                (code, message)
            }
        };
        CommandError::new(code, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn affordability_denial_maps_to_insufficient_funds() {
        let err = EconomyError::AuthorizationDenied {
            policy: CanAffordRedemption.name(),
        };
        let cmd_err: CommandError = err.into();
        assert_eq!(cmd_err.code, CommandErrorCode::InsufficientFunds);
        assert!(cmd_err.message.contains("can_afford_redemption"));
    }

    #[test]
    fn other_policy_denials_stay_authorization_denied() {
        let err = EconomyError::AuthorizationDenied {
            policy: "user_is_active",
        };
        let cmd_err: CommandError = err.into();
        assert_eq!(cmd_err.code, CommandErrorCode::AuthorizationDenied);
    }

    #[test]
    fn busy_storage_errors_surface_as_retriable_conflict() {
        let err = EconomyError::Repo(RepoError::Busy);
        let cmd_err: CommandError = err.into();
        assert_eq!(cmd_err.code, CommandErrorCode::Conflict);
        assert!(cmd_err.code.is_retriable());
    }

    #[test]
    fn raw_database_errors_are_not_leaked() {
        let err = EconomyError::Repo(RepoError::Database("UNIQUE constraint secret".into()));
        let cmd_err: CommandError = err.into();
        assert_eq!(cmd_err.code, CommandErrorCode::InternalError);
        assert!(!cmd_err.message.contains("secret"));
    }
}
