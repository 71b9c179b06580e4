//! Server state - process-wide wiring
//!
//! All services are constructed here, once, with explicit dependencies.
//! Nothing reaches for globals; tests build the same graph against an
//! in-memory database.

use anyhow::Result;
use std::sync::Arc;

use crate::core::Config;
use crate::db::DbService;
use crate::economy::{EconomyService, EventBus, PolicyGate};
use crate::services::{GamificationService, GamificationWorker, RankService, UserService};

pub struct ServerState {
    pub config: Config,
    pub db: DbService,
    pub event_bus: EventBus,
    pub economy: Arc<EconomyService>,
    pub users: Arc<UserService>,
    pub rank: Arc<RankService>,
}

impl ServerState {
    /// Initialize all services and start the background workers
    pub async fn initialize(config: Config) -> Result<Self> {
        tracing::info!(db_path = %config.db_path, "Initializing server state");

        let db = DbService::new(&config.db_path).await?;
        let event_bus = EventBus::new(config.event_buffer);
        let rank = Arc::new(RankService::new(db.pool.clone(), config.ranks.clone()));

        let economy = Arc::new(EconomyService::new(
            db.pool.clone(),
            config.clone(),
            PolicyGate::standard(),
            event_bus.clone(),
            rank.clone(),
        ));
        let users = Arc::new(UserService::new(
            db.pool.clone(),
            config.clone(),
            event_bus.clone(),
            rank.clone(),
        ));

        let worker = GamificationWorker::new(
            GamificationService::new(db.pool.clone()),
            event_bus.clone(),
            rank.clone(),
        );
        tokio::spawn(worker.run());

        Ok(Self {
            config,
            db,
            event_bus,
            economy,
            users,
            rank,
        })
    }
}
