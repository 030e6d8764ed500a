// ==========================================
// DS 数据仓库装载 - 计划执行器
// ==========================================
// 按计划顺序逐表装载;任一表致命失败即停止,后续表不执行
// 已成功的表保持提交状态
// ==========================================

use crate::config::etl_config::EtlConfig;
use crate::config::load_plan::LoadJob;
use crate::db::{init_warehouse_schema, open_sqlite_connection};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::loader_trait::AuditLogger;
use crate::importer::table_loader::{LoadReport, TableLoader};
use crate::repository::etl_log_repo::EtlLogRepository;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{info, instrument};
use uuid::Uuid;

pub struct EtlRunner<A: AuditLogger> {
    loader: TableLoader<A>,
    data_dir: PathBuf,
}

impl<A: AuditLogger> EtlRunner<A> {
    pub fn new(loader: TableLoader<A>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            loader,
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// 依次执行装载计划
    ///
    /// # 返回
    /// - Ok(reports): 全部表装载成功,按计划顺序
    /// - Err(ImportError): 第一个致命失败的错误
    #[instrument(skip(self, plan), fields(run_id = %Uuid::new_v4(), jobs = plan.len()))]
    pub fn run(&self, plan: &[LoadJob]) -> ImportResult<Vec<LoadReport>> {
        let mut reports = Vec::with_capacity(plan.len());

        for job in plan {
            let job = job.resolved_against(&self.data_dir);
            reports.push(self.loader.load(&job)?);
        }

        info!(
            tables = reports.len(),
            rows = reports.iter().map(|r| r.rows_processed).sum::<usize>(),
            "装载计划完成"
        );
        Ok(reports)
    }
}

impl EtlRunner<EtlLogRepository> {
    /// 按配置打开仓库库并建表,审计写入同一数据库的 etl_logs
    pub fn from_config(config: &EtlConfig) -> ImportResult<Self> {
        if let Some(parent) = config.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let db_path = config.db_path.to_str().ok_or_else(|| {
            ImportError::DatabaseConnectionError(format!(
                "数据库路径不是合法 UTF-8: {}",
                config.db_path.display()
            ))
        })?;

        let conn = open_sqlite_connection(db_path)
            .map_err(|e| ImportError::DatabaseConnectionError(e.to_string()))?;
        init_warehouse_schema(&conn)?;
        info!(db_path = db_path, "仓库数据库已就绪");

        let conn = Arc::new(Mutex::new(conn));
        let audit = EtlLogRepository::new(conn.clone());
        Ok(Self::new(TableLoader::new(conn, audit), &config.data_dir))
    }
}
