// ==========================================
// DS 数据仓库装载 - 配置层
// ==========================================
// 职责: 运行配置（数据库/源目录/日志格式）与装载计划
// 来源: 默认值 < JSON 配置文件 < 环境变量
// ==========================================

pub mod etl_config;
pub mod load_plan;

pub use etl_config::{env_keys, EtlConfig, LogFormat};
pub use load_plan::{standard_plan, LoadJob};
