// ==========================================
// DS 数据仓库装载 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod error;
pub mod etl_log_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use etl_log_repo::EtlLogRepository;
