// ==========================================
// DS 数据仓库装载 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 分级: ImportError 为整表致命错误; RowRejection 为单行可恢复错误
// ==========================================

use thiserror::Error;

/// 整表装载错误（中止当前表,记录 FAILED 并向调用方传播）
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    // ===== 规格/结构错误 =====
    #[error("未注册的目标表: {0}")]
    UnknownTable(String),

    #[error("日期列在文件中不存在 (表 {table_id}): {column}")]
    DateColumnMissing { table_id: String, column: String },

    #[error("日期格式错误 (行 {row}, 字段 {field}): 无法识别 {value}")]
    DateFormatError {
        row: usize,
        field: String,
        value: String,
    },

    // ===== 数据库错误 =====
    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("数据库事务失败: {0}")]
    DatabaseTransactionError(String),

    #[error("数据库查询失败: {0}")]
    DatabaseQueryError(String),

    // ===== 配置错误 =====
    #[error("配置读取失败 (key: {key}): {message}")]
    ConfigReadError { key: String, message: String },

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => ImportError::FileNotFound(err.to_string()),
            _ => ImportError::FileReadError(err.to_string()),
        }
    }
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for ImportError {
    fn from(err: rusqlite::Error) -> Self {
        ImportError::DatabaseQueryError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;

/// 单行拒绝原因（跳过该行,继续装载）
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RowRejection {
    #[error("必填字段缺失: {column}")]
    MissingRequired { column: String },

    #[error("类型转换失败 (字段 {column}): 无法将 {value} 解析为{expected}")]
    TypeConversion {
        column: String,
        value: String,
        expected: &'static str,
    },

    #[error("写入失败: {0}")]
    Database(String),
}

impl From<rusqlite::Error> for RowRejection {
    fn from(err: rusqlite::Error) -> Self {
        RowRejection::Database(err.to_string())
    }
}

/// 日期解析失败（携带原始值）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("无法识别的日期: {value:?}")]
pub struct DateParseError {
    pub value: String,
}
