use shared::models::RankThresholds;

/// 服务器配置 - 经济引擎的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/loyalty | 工作目录 |
/// | DB_PATH | <WORK_DIR>/loyalty.db | SQLite 数据库文件 |
/// | CLAIM_TTL_MS | 900000 | 未注册认领的保留时间(毫秒) |
/// | REFERRER_BONUS | 100 | 推荐人奖励积分 |
/// | REFEREE_BONUS | 50 | 被推荐人奖励积分 |
/// | RANK_SILVER / RANK_GOLD / RANK_PLATINUM | 500 / 2000 / 10000 | 等级阈值 |
/// | EVENT_BUFFER | 256 | 事件广播缓冲区大小 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/loyalty CLAIM_TTL_MS=600000 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录
    pub work_dir: String,
    /// SQLite 数据库路径
    pub db_path: String,
    /// Unauthenticated claims reserve a code for this long; stale claims
    /// are lazily released by the next claim/scan attempt
    pub claim_ttl_ms: i64,
    /// Points credited to the referrer on a referee's registration
    pub referrer_bonus: i64,
    /// Points credited to the referee on their own registration
    pub referee_bonus: i64,
    /// Lifetime-point thresholds for rank derivation
    pub ranks: RankThresholds,
    /// Event broadcast channel capacity
    pub event_buffer: usize,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/loyalty".into());
        let db_path =
            std::env::var("DB_PATH").unwrap_or_else(|_| format!("{work_dir}/loyalty.db"));
        Self {
            work_dir,
            db_path,
            claim_ttl_ms: env_i64("CLAIM_TTL_MS", 900_000),
            referrer_bonus: env_i64("REFERRER_BONUS", 100),
            referee_bonus: env_i64("REFEREE_BONUS", 50),
            ranks: RankThresholds {
                silver: env_i64("RANK_SILVER", 500),
                gold: env_i64("RANK_GOLD", 2_000),
                platinum: env_i64("RANK_PLATINUM", 10_000),
            },
            // broadcast::channel panics on capacity 0, and a negative
            // value would wrap when cast
            event_buffer: env_i64("EVENT_BUFFER", 256).max(1) as usize,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            work_dir: "/var/lib/loyalty".into(),
            db_path: ":memory:".into(),
            claim_ttl_ms: 900_000,
            referrer_bonus: 100,
            referee_bonus: 50,
            ranks: RankThresholds::default(),
            event_buffer: 256,
        }
    }
}

fn env_i64(key: &str, default: i64) -> i64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
