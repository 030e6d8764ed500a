// ==========================================
// DS 数据仓库装载 - 装载审计日志数据仓储
// ==========================================
// 对齐: etl_logs 表
// 红线: 只追加,不更新、不删除
// ==========================================

mod core;
mod queries;


pub use core::{EtlLogRepository, ETL_LOGS_DDL};
