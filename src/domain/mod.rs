// ==========================================
// DS 数据仓库装载 - 领域模型层
// ==========================================
// 职责: 定义表规格、单元格值、审计日志条目
// 红线: 不含数据访问逻辑,不含装载流程逻辑
// ==========================================

pub mod etl_log;
pub mod table_spec;
pub mod value;

// 重导出核心类型
pub use etl_log::{LoadStatus, LogEntry};
pub use table_spec::{ColumnDefault, ColumnKind, ColumnSpec, ReloadStrategy, TableSpec};
pub use value::CellValue;
