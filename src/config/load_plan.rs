// ==========================================
// DS 数据仓库装载 - 装载任务与装载计划
// ==========================================
// LoadJob: 一次单表装载的不可变描述
// 标准计划: 6 张 DS 表按固定顺序依次装载
// ==========================================

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 单表装载任务
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadJob {
    /// 源文件路径（相对路径按 data_dir 解析）
    pub source_path: PathBuf,

    /// 目标表标识（如 DS.FT_BALANCE_F）
    pub table_id: String,

    /// 需要归一化的日期列（源列名）
    #[serde(default)]
    pub date_columns: Vec<String>,
}

impl LoadJob {
    pub fn new<P: Into<PathBuf>>(source_path: P, table_id: &str, date_columns: &[&str]) -> Self {
        Self {
            source_path: source_path.into(),
            table_id: table_id.to_string(),
            date_columns: date_columns.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// 相对源路径解析到数据目录下
    pub fn resolved_against(&self, data_dir: &Path) -> LoadJob {
        if self.source_path.is_absolute() {
            return self.clone();
        }
        LoadJob {
            source_path: data_dir.join(&self.source_path),
            ..self.clone()
        }
    }
}

/// 标准装载计划（事实表在前,维表在后）
pub fn standard_plan() -> Vec<LoadJob> {
    vec![
        LoadJob::new("FT_BALANCE_F.csv", "DS.FT_BALANCE_F", &["ON_DATE"]),
        LoadJob::new("FT_POSTING_F.csv", "DS.FT_POSTING_F", &["OPER_DATE"]),
        LoadJob::new(
            "MD_ACCOUNT_D.csv",
            "DS.MD_ACCOUNT_D",
            &["DATA_ACTUAL_DATE", "DATA_ACTUAL_END_DATE"],
        ),
        LoadJob::new(
            "MD_CURRENCY_D.csv",
            "DS.MD_CURRENCY_D",
            &["DATA_ACTUAL_DATE", "DATA_ACTUAL_END_DATE"],
        ),
        LoadJob::new(
            "MD_EXCHANGE_RATE_D.csv",
            "DS.MD_EXCHANGE_RATE_D",
            &["DATA_ACTUAL_DATE", "DATA_ACTUAL_END_DATE"],
        ),
        LoadJob::new(
            "MD_LEDGER_ACCOUNT_S.csv",
            "DS.MD_LEDGER_ACCOUNT_S",
            &["START_DATE", "END_DATE"],
        ),
    ]
}
