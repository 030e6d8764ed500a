// ==========================================
// DS 数据仓库装载 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少审计与装载交替写入时的偶发 busy 错误
// - 按注册表建目标表与 etl_logs（IF NOT EXISTS，可重复执行）
// ==========================================

use crate::importer::table_registry::TableSpecRegistry;
use crate::repository::etl_log_repo::ETL_LOGS_DDL;
use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;
use tracing::debug;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let mut conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    conn.trace(Some(trace_sql));
    Ok(conn)
}

/// 语句级跟踪（RUST_LOG=ds_etl::sql=trace 开启）
fn trace_sql(sql: &str) {
    tracing::trace!(target: "ds_etl::sql", sql = sql);
}

/// 建立 DS 层目标表与审计表
pub fn init_warehouse_schema(conn: &Connection) -> rusqlite::Result<()> {
    for spec in TableSpecRegistry::standard().iter() {
        conn.execute_batch(&spec.create_table_sql())?;
        debug!(target_table = spec.target_table, "目标表已就绪");
    }
    conn.execute_batch(ETL_LOGS_DDL)?;
    Ok(())
}

/// 判断表是否存在
pub fn table_exists(conn: &Connection, table_name: &str) -> rusqlite::Result<bool> {
    Ok(conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1 LIMIT 1",
            [table_name],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false))
}
