// ==========================================
// DS 数据仓库装载 - 装载组件 Trait 定义
// ==========================================
// 职责: 定义装载流程中可替换的协作者接口
// 红线: 只定义接口,不含实现
// ==========================================

use crate::domain::etl_log::LogEntry;
use crate::importer::error::ImportResult;
use crate::importer::file_parser::SourceTable;
use crate::repository::error::RepositoryResult;
use std::path::Path;
use std::sync::Arc;

// ==========================================
// SourceParser Trait
// ==========================================
// 用途: 源文件 → 表头 + 原始行
// 实现者: CsvSourceParser
pub trait SourceParser: Send + Sync {
    /// 解析源文件
    ///
    /// # 返回
    /// - Ok(SourceTable): 表头（大写）与按源顺序排列的数据行
    /// - Err(ImportError::FileNotFound): 文件不存在
    fn parse(&self, file_path: &Path) -> ImportResult<SourceTable>;
}

// ==========================================
// AuditLogger Trait
// ==========================================
// 用途: 记录 STARTED / SUCCESS / FAILED 状态迁移
// 实现者: EtlLogRepository（写入 etl_logs 表）
// 约束: 每次调用是独立的工作单元,立即提交
pub trait AuditLogger: Send + Sync {
    fn record(&self, entry: &LogEntry) -> RepositoryResult<()>;
}

impl<T: AuditLogger + ?Sized> AuditLogger for Arc<T> {
    fn record(&self, entry: &LogEntry) -> RepositoryResult<()> {
        (**self).record(entry)
    }
}
