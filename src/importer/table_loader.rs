// ==========================================
// DS 数据仓库装载 - 单表装载编排器
// ==========================================
// 流程: STARTED → 读文件 → 查规格 → 日期列校验与归一化 → (清表) → 逐行写入 → SUCCESS
//       步骤 2~4 或事务失败时 → FAILED 并向调用方传播
// 事务: 整表一个事务,每行一个保存点;单行失败只回滚该行
// 审计: 审计写入不持有数据事务,失败只记录诊断日志
// ==========================================

use crate::config::load_plan::LoadJob;
use crate::domain::etl_log::LogEntry;
use crate::domain::table_spec::{ReloadStrategy, TableSpec};
use crate::importer::date_normalizer::DateNormalizer;
use crate::importer::error::{ImportError, ImportResult, RowRejection};
use crate::importer::file_parser::{CsvSourceParser, SourceTable};
use crate::importer::loader_trait::{AuditLogger, SourceParser};
use crate::importer::table_registry::TableSpecRegistry;
use crate::importer::upsert_dispatcher::UpsertDispatcher;
use rusqlite::{Connection, Savepoint};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

// ==========================================
// 装载结果
// ==========================================

/// 被跳过的行
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRow {
    pub row_number: usize,
    pub reason: String,
}

/// 单表装载报告
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadReport {
    pub table_id: String,
    pub rows_read: usize,
    pub rows_processed: usize,
    pub skipped: Vec<SkippedRow>,
    pub elapsed_ms: u64,
}

// ==========================================
// TableLoader - 单表装载编排器
// ==========================================
pub struct TableLoader<A: AuditLogger> {
    conn: Arc<Mutex<Connection>>,
    audit: A,
    parser: Box<dyn SourceParser>,
    registry: &'static TableSpecRegistry,
    normalizer: DateNormalizer,
    dispatcher: UpsertDispatcher,
}

impl<A: AuditLogger> TableLoader<A> {
    /// 使用标准注册表与 CSV 解析器创建编排器
    pub fn new(conn: Arc<Mutex<Connection>>, audit: A) -> Self {
        Self::with_components(
            conn,
            audit,
            Box::new(CsvSourceParser::new()),
            TableSpecRegistry::standard(),
        )
    }

    pub fn with_components(
        conn: Arc<Mutex<Connection>>,
        audit: A,
        parser: Box<dyn SourceParser>,
        registry: &'static TableSpecRegistry,
    ) -> Self {
        Self {
            conn,
            audit,
            parser,
            registry,
            normalizer: DateNormalizer::new(),
            dispatcher: UpsertDispatcher::new(),
        }
    }

    /// 装载一个源文件到目标表
    ///
    /// # 返回
    /// - Ok(LoadReport): 已提交,审计记录 SUCCESS
    /// - Err(ImportError): 整表失败,事务已回滚,审计记录 FAILED
    #[instrument(skip(self, job), fields(table_id = %job.table_id))]
    pub fn load(&self, job: &LoadJob) -> ImportResult<LoadReport> {
        let started_at = Instant::now();
        self.audit_event(LogEntry::started(&job.table_id));
        info!(source = %job.source_path.display(), "开始装载");

        match self.execute(job, started_at) {
            Ok(report) => {
                self.audit_event(LogEntry::success(&job.table_id, report.rows_processed));
                info!(
                    rows_read = report.rows_read,
                    rows_processed = report.rows_processed,
                    skipped = report.skipped.len(),
                    elapsed_ms = report.elapsed_ms,
                    "装载成功"
                );
                Ok(report)
            }
            Err(e) => {
                self.audit_event(LogEntry::failed(&job.table_id, e.to_string()));
                error!(error = %e, "装载失败");
                Err(e)
            }
        }
    }

    // ==========================================
    // 装载步骤
    // ==========================================

    fn execute(&self, job: &LoadJob, started_at: Instant) -> ImportResult<LoadReport> {
        // === 步骤 1: 读取源文件 ===
        let mut source = self.parser.parse(&job.source_path)?;
        info!(columns = ?source.headers, rows = source.rows.len(), "源文件列");

        // === 步骤 2: 查找表规格 ===
        let spec = self.registry.lookup(&job.table_id)?;

        // === 步骤 3: 日期列校验与归一化 ===
        self.normalize_date_columns(spec, job, &mut source)?;

        // === 步骤 4: 事务内写入 ===
        let (rows_processed, skipped) = self.write_rows(spec, &source)?;

        Ok(LoadReport {
            table_id: spec.table_id.to_string(),
            rows_read: source.rows.len(),
            rows_processed,
            skipped,
            elapsed_ms: started_at.elapsed().as_millis() as u64,
        })
    }

    /// 配置的日期列必须全部存在;任意一个值无法解析即整表失败
    fn normalize_date_columns(
        &self,
        spec: &TableSpec,
        job: &LoadJob,
        source: &mut SourceTable,
    ) -> ImportResult<()> {
        for column in &job.date_columns {
            if !source.has_column(column) {
                return Err(ImportError::DateColumnMissing {
                    table_id: spec.table_id.to_string(),
                    column: column.clone(),
                });
            }
        }

        for row in &mut source.rows {
            for column in &job.date_columns {
                let raw = match row.get(column) {
                    Some(v) if !v.trim().is_empty() => v.to_string(),
                    // 空值交给分发器按必填/可选处理
                    _ => continue,
                };

                let date = self.normalizer.normalize(&raw).map_err(|e| {
                    ImportError::DateFormatError {
                        row: row.row_number,
                        field: column.clone(),
                        value: e.value,
                    }
                })?;
                row.set(column, date.format("%Y-%m-%d").to_string());
            }
        }

        debug!(columns = ?job.date_columns, "日期列归一化完成");
        Ok(())
    }

    fn write_rows(
        &self,
        spec: &TableSpec,
        source: &SourceTable,
    ) -> ImportResult<(usize, Vec<SkippedRow>)> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| ImportError::DatabaseConnectionError(format!("锁获取失败: {}", e)))?;
        let mut tx = conn
            .transaction()
            .map_err(|e| ImportError::DatabaseTransactionError(e.to_string()))?;

        if spec.reload_strategy == ReloadStrategy::TruncateAndAppend {
            let removed = self.dispatcher.truncate(&tx, spec)?;
            info!(removed = removed, target = spec.target_table, "目标表已清空");
        }

        let mut rows_processed = 0;
        let mut skipped = Vec::new();

        for row in &source.rows {
            let sp = tx
                .savepoint()
                .map_err(|e| ImportError::DatabaseTransactionError(e.to_string()))?;

            match self.dispatcher.apply(&sp, spec, row) {
                Ok(()) => {
                    sp.commit()
                        .map_err(|e| ImportError::DatabaseTransactionError(e.to_string()))?;
                    rows_processed += 1;
                }
                Err(reason) => {
                    discard(sp).map_err(|e| ImportError::DatabaseTransactionError(e.to_string()))?;
                    warn!(row_number = row.row_number, reason = %reason, "跳过行");
                    skipped.push(skipped_row(row.row_number, &reason));
                }
            }
        }

        // 未提交的事务在 drop 时回滚
        tx.commit()
            .map_err(|e| ImportError::DatabaseTransactionError(e.to_string()))?;

        Ok((rows_processed, skipped))
    }

    /// 审计写入失败不影响装载结果
    fn audit_event(&self, entry: LogEntry) {
        if let Err(e) = self.audit.record(&entry) {
            error!(
                process_name = %entry.process_name,
                status = %entry.status,
                error = %e,
                "审计日志写入失败"
            );
        }
    }
}

/// 回滚到保存点并释放
fn discard(mut sp: Savepoint<'_>) -> rusqlite::Result<()> {
    sp.rollback()?;
    sp.commit()
}

fn skipped_row(row_number: usize, reason: &RowRejection) -> SkippedRow {
    SkippedRow {
        row_number,
        reason: reason.to_string(),
    }
}
