//! Domain models
//!
//! One file per entity family. `sqlx::FromRow` derives are gated behind
//! the `db` feature so client-side consumers stay free of sqlx.

pub mod achievement;
pub mod action_log;
pub mod claim_token;
pub mod order;
pub mod product;
pub mod rank;
pub mod reward_code;
pub mod user;

// Re-exports
pub use achievement::{Achievement, AchievementCriteria, AchievementUnlock};
pub use action_log::{ActionLogEntry, ActionType};
pub use claim_token::ClaimToken;
pub use order::{Order, OrderStatus};
pub use product::{Product, ProductCreate};
pub use rank::{Rank, RankThresholds};
pub use reward_code::{RewardCode, RewardCodeStatus};
pub use user::{NewUserProfile, ProfileChanges, User};
