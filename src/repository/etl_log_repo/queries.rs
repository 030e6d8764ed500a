use super::core::{EtlLogRepository, TS_FORMAT};
use crate::domain::etl_log::{LoadStatus, LogEntry};
use crate::repository::error::RepositoryResult;
use chrono::NaiveDateTime;
use rusqlite::{params, OptionalExtension, Result as SqliteResult, Row};

impl EtlLogRepository {
    // ==========================================
    // 查询操作
    // ==========================================

    /// 查询指定进程的全部日志（按写入顺序）
    pub fn list_by_process(&self, process_name: &str) -> RepositoryResult<Vec<LogEntry>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT process_name, start_time, status, rows_processed, error_message
            FROM etl_logs
            WHERE process_name = ?
            ORDER BY log_id ASC
            "#,
        )?;

        let logs = stmt
            .query_map(params![process_name], |row| self.map_row(row))?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(logs)
    }

    /// 查询指定进程最近一条日志
    pub fn latest_by_process(&self, process_name: &str) -> RepositoryResult<Option<LogEntry>> {
        let conn = self.get_conn()?;

        let entry = conn
            .query_row(
                r#"
                SELECT process_name, start_time, status, rows_processed, error_message
                FROM etl_logs
                WHERE process_name = ?
                ORDER BY log_id DESC
                LIMIT 1
                "#,
                params![process_name],
                |row| self.map_row(row),
            )
            .optional()?;

        Ok(entry)
    }

    /// 统计指定进程某状态的日志条数
    pub fn count_by_status(&self, process_name: &str, status: LoadStatus) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM etl_logs WHERE process_name = ? AND status = ?",
            params![process_name, status.as_str()],
            |row| row.get(0),
        )?;

        Ok(count)
    }

    /// 日志总条数
    pub fn count_all(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM etl_logs", [], |row| row.get(0))?;
        Ok(count)
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    /// 将数据库行映射为 LogEntry
    fn map_row(&self, row: &Row) -> SqliteResult<LogEntry> {
        let process_name: String = row.get(0)?;
        let start_time_str: String = row.get(1)?;
        let status_str: String = row.get(2)?;
        let rows_processed: Option<i64> = row.get(3)?;
        let error_message: Option<String> = row.get(4)?;

        let start_time = NaiveDateTime::parse_from_str(&start_time_str, TS_FORMAT).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
        })?;

        let status = status_str.parse::<LoadStatus>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                2,
                rusqlite::types::Type::Text,
                Box::<dyn std::error::Error + Send + Sync>::from(e),
            )
        })?;

        Ok(LogEntry {
            process_name,
            start_time,
            status,
            rows_processed,
            error_message,
        })
    }
}
