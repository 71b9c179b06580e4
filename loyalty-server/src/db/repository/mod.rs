//! Repository Module
//!
//! Typed data-access gateways over SQLite. Each module wraps read/write
//! access to one entity family and is the only place SQL-level state
//! mutation occurs. Functions are generic over the executor so the same
//! operation runs against the pool or inside a transaction.

pub mod achievement;
pub mod action_log;
pub mod claim_token;
pub mod order;
pub mod product;
pub mod reward_code;
pub mod user;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("duplicate: {0}")]
    Duplicate(String),

    /// Write contention (SQLITE_BUSY / locked) — retriable by the caller
    #[error("database busy")]
    Busy,

    #[error("database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) => {
                if db.is_unique_violation() {
                    RepoError::Duplicate(db.message().to_string())
                } else {
                    let msg = db.message().to_lowercase();
                    if msg.contains("locked") || msg.contains("busy") {
                        RepoError::Busy
                    } else {
                        RepoError::Database(db.message().to_string())
                    }
                }
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
