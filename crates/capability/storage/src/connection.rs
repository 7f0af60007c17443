//! 数据库连接管理
//!
//! - connect_pool：建立 Postgres 连接池（床位查询与告警写入共用）

use crate::error::StorageError;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;
use tracing::info;

/// 连接池上限。
const MAX_CONNECTIONS: u32 = 8;

/// 建立 Postgres 连接池
pub async fn connect_pool(database_url: &str) -> Result<PgPool, StorageError> {
    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await?;
    info!(target: "bedwatch.storage", max_connections = MAX_CONNECTIONS, "db_pool_connected");
    Ok(pool)
}
