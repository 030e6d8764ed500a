// ==========================================
// DS 数据仓库装载 - 核心库
// ==========================================
// 技术栈: Rust + SQLite + CSV
// 系统定位: 银行 DS 层批量装载（日期归一化 / 冲突更新 / 审计日志）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 表规格/单元值/审计记录
pub mod domain;

// 数据仓储层 - 审计日志
pub mod repository;

// 导入层 - 源文件装载
pub mod importer;

// 配置层 - 运行配置与装载计划
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{CellValue, ColumnKind, ColumnSpec, LoadStatus, LogEntry, ReloadStrategy, TableSpec};

// 导入
pub use importer::{
    AuditLogger, DateNormalizer, EtlRunner, ImportError, ImportResult, LoadReport,
    TableLoader, TableSpecRegistry, UpsertDispatcher,
};

// 配置
pub use config::{EtlConfig, LoadJob};

// 仓储
pub use repository::EtlLogRepository;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "DS 数据仓库装载";
