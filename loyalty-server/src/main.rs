use loyalty_server::{Config, ServerState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 环境与日志
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(false)
        .init();

    tracing::info!("Loyalty economy engine starting...");

    // 2. 加载配置
    let config = Config::from_env();

    // 3. 初始化状态 (数据库, 服务, 后台任务)
    let state = ServerState::initialize(config).await?;
    tracing::info!(db_path = %state.config.db_path, "Engine ready");

    // The engine is driven by an embedding API surface; this process
    // just keeps the workers alive until asked to stop.
    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received, stopping");

    Ok(())
}
