// ==========================================
// DS 数据仓库装载 - 装载审计日志领域模型
// ==========================================
// 对齐: etl_logs 表
// 红线: 只追加,不更新、不删除
// ==========================================

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// LoadStatus - 装载状态
// ==========================================
// 状态机: STARTED → SUCCESS / FAILED（终态）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoadStatus {
    Started,
    Success,
    Failed,
}

impl LoadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadStatus::Started => "STARTED",
            LoadStatus::Success => "SUCCESS",
            LoadStatus::Failed => "FAILED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, LoadStatus::Started)
    }
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoadStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "STARTED" => Ok(LoadStatus::Started),
            "SUCCESS" => Ok(LoadStatus::Success),
            "FAILED" => Ok(LoadStatus::Failed),
            other => Err(format!("未知装载状态: {}", other)),
        }
    }
}

// ==========================================
// LogEntry - 审计日志条目
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub process_name: String,          // 进程名 (目标表标识)
    pub start_time: NaiveDateTime,     // 事件时间
    pub status: LoadStatus,
    pub rows_processed: Option<i64>,   // 仅 SUCCESS 填写
    pub error_message: Option<String>, // 仅 FAILED 填写
}

impl LogEntry {
    pub fn started(process_name: &str) -> Self {
        Self::new(process_name, LoadStatus::Started, None, None)
    }

    pub fn success(process_name: &str, rows_processed: usize) -> Self {
        Self::new(
            process_name,
            LoadStatus::Success,
            Some(rows_processed as i64),
            None,
        )
    }

    pub fn failed(process_name: &str, error: impl Into<String>) -> Self {
        Self::new(process_name, LoadStatus::Failed, None, Some(error.into()))
    }

    fn new(
        process_name: &str,
        status: LoadStatus,
        rows_processed: Option<i64>,
        error_message: Option<String>,
    ) -> Self {
        Self {
            process_name: process_name.to_string(),
            start_time: Local::now().naive_local(),
            status,
            rows_processed,
            error_message,
        }
    }
}
