//! Domain services built on the economy engine

pub mod gamification;
pub mod rank;
pub mod referral;
pub mod user_service;

pub use gamification::{GamificationService, GamificationWorker};
pub use rank::RankService;
pub use referral::ReferralService;
pub use user_service::UserService;
