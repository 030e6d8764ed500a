// ==========================================
// DS 数据仓库装载 - 导入层
// ==========================================
// 职责: 源 CSV → 日期归一化 → 按表规格写入 DS 层
// 流程: EtlRunner → TableLoader → (SourceParser, UpsertDispatcher, AuditLogger)
// ==========================================

// 模块声明
pub mod date_normalizer;
pub mod error;
pub mod etl_runner;
pub mod file_parser;
pub mod loader_trait;
pub mod table_loader;
pub mod table_registry;
pub mod upsert_dispatcher;

// 重导出核心类型
pub use date_normalizer::DateNormalizer;
pub use error::{DateParseError, ImportError, ImportResult, RowRejection};
pub use etl_runner::EtlRunner;
pub use file_parser::{CsvSourceParser, SourceRow, SourceTable};
pub use table_loader::{LoadReport, SkippedRow, TableLoader};
pub use table_registry::{TableSpecRegistry, DS_TABLES};
pub use upsert_dispatcher::UpsertDispatcher;

// 重导出 Trait 接口
pub use loader_trait::{AuditLogger, SourceParser};
