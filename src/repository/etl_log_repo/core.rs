use crate::domain::etl_log::LogEntry;
use crate::importer::loader_trait::AuditLogger;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

/// 审计日志时间戳格式
pub(super) const TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// etl_logs 建表语句
pub const ETL_LOGS_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS etl_logs (
    log_id INTEGER PRIMARY KEY AUTOINCREMENT,
    process_name TEXT NOT NULL,
    start_time TEXT NOT NULL,
    status TEXT NOT NULL CHECK (status IN ('STARTED', 'SUCCESS', 'FAILED')),
    rows_processed INTEGER,
    error_message TEXT
)
"#;

// ==========================================
// EtlLogRepository - 装载审计日志仓储
// ==========================================
// 红线: Repository 不做业务逻辑,只做数据映射
pub struct EtlLogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl EtlLogRepository {
    /// 创建新的审计日志仓储
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    pub(super) fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 写入操作
    // ==========================================

    /// 追加一条审计日志（独立事务,立即提交）
    ///
    /// # 返回
    /// - `Ok(log_id)`: 自增主键
    /// - `Err(...)`: 数据库错误（含外层已有未结束事务的情况）
    pub fn insert(&self, entry: &LogEntry) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        tx.execute(
            r#"
            INSERT INTO etl_logs (
                process_name, start_time, status, rows_processed, error_message
            ) VALUES (?, ?, ?, ?, ?)
            "#,
            params![
                entry.process_name,
                entry.start_time.format(TS_FORMAT).to_string(),
                entry.status.as_str(),
                entry.rows_processed,
                entry.error_message,
            ],
        )?;
        let log_id = tx.last_insert_rowid();

        tx.commit()?;
        Ok(log_id)
    }
}

impl AuditLogger for EtlLogRepository {
    fn record(&self, entry: &LogEntry) -> RepositoryResult<()> {
        self.insert(entry).map(|_| ())
    }
}
