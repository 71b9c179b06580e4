//! Policy Gate - pure authorization predicates
//!
//! Each policy is evaluated against the command and the context snapshot
//! before the handler runs. Policies never write and never do I/O. All
//! registered policies for a command kind must pass (logical AND); the
//! first failure aborts dispatch with the failing policy's name.
//!
//! The registry is keyed by `CommandKind` and built once at startup —
//! there is no runtime lookup by class or string name.

use crate::economy::context::EvalContext;
use crate::economy::error::EconomyError;
use shared::economy::{CommandKind, EconomyCommand};
use std::collections::HashMap;

/// Pure authorization predicate
pub trait Policy: Send + Sync {
    fn name(&self) -> &'static str;
    fn evaluate(&self, command: &EconomyCommand, ctx: &EvalContext) -> bool;
}

/// Subject user must exist and be active
pub struct UserIsActive;

impl Policy for UserIsActive {
    fn name(&self) -> &'static str {
        "user_is_active"
    }

    fn evaluate(&self, _command: &EconomyCommand, ctx: &EvalContext) -> bool {
        ctx.user.as_ref().is_some_and(|u| u.user.is_active)
    }
}

/// Redemption target must be an active product with a positive cost
pub struct ProductIsRedeemable;

impl Policy for ProductIsRedeemable {
    fn name(&self) -> &'static str {
        "product_is_redeemable"
    }

    fn evaluate(&self, _command: &EconomyCommand, ctx: &EvalContext) -> bool {
        ctx.product
            .as_ref()
            .is_some_and(|p| p.is_active && p.point_cost > 0)
    }
}

/// Snapshot balance must cover the redemption cost.
///
/// Advisory only: the handler re-checks against the transaction, because
/// the balance can change between this evaluation and execution.
pub struct CanAffordRedemption;

impl Policy for CanAffordRedemption {
    fn name(&self) -> &'static str {
        "can_afford_redemption"
    }

    fn evaluate(&self, _command: &EconomyCommand, ctx: &EvalContext) -> bool {
        match (&ctx.user, &ctx.product) {
            (Some(user), Some(product)) => user.balance >= product.point_cost,
            _ => false,
        }
    }
}

/// Per-command-kind policy registry, built once at startup
pub struct PolicyGate {
    policies: HashMap<CommandKind, Vec<Box<dyn Policy>>>,
}

impl PolicyGate {
    pub fn new() -> Self {
        Self {
            policies: HashMap::new(),
        }
    }

    pub fn register(mut self, kind: CommandKind, policy: Box<dyn Policy>) -> Self {
        self.policies.entry(kind).or_default().push(policy);
        self
    }

    /// The standard production registry
    pub fn standard() -> Self {
        Self::new()
            .register(CommandKind::RedeemReward, Box::new(UserIsActive))
            .register(CommandKind::RedeemReward, Box::new(ProductIsRedeemable))
            .register(CommandKind::RedeemReward, Box::new(CanAffordRedemption))
            .register(CommandKind::ProcessProductScan, Box::new(UserIsActive))
            .register(CommandKind::UpdateProfile, Box::new(UserIsActive))
    }

    /// Evaluate every policy registered for the command's kind.
    ///
    /// Zero registered policies means the command is not policy-gated.
    pub fn check(
        &self,
        command: &EconomyCommand,
        ctx: &EvalContext,
    ) -> Result<(), EconomyError> {
        if let Some(policies) = self.policies.get(&command.kind()) {
            for policy in policies {
                if !policy.evaluate(command, ctx) {
                    tracing::debug!(
                        command = %command.kind(),
                        policy = policy.name(),
                        "Policy denied command"
                    );
                    return Err(EconomyError::AuthorizationDenied {
                        policy: policy.name(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl Default for PolicyGate {
    fn default() -> Self {
        Self::new()
    }
}
