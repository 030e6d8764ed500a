// ==========================================
// DS 数据仓库装载 - 运行配置
// ==========================================
// 来源: 默认值 < JSON 配置文件 < 环境变量 (DS_ETL_*)
// 约束: 相对源路径按 data_dir 解析
// ==========================================

use crate::config::load_plan::{standard_plan, LoadJob};
use crate::importer::error::{ImportError, ImportResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 环境变量键
pub mod env_keys {
    pub const DB_PATH: &str = "DS_ETL_DB_PATH";
    pub const DATA_DIR: &str = "DS_ETL_DATA_DIR";
    pub const LOG_FORMAT: &str = "DS_ETL_LOG_FORMAT";
}

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(ImportError::ConfigReadError {
                key: env_keys::LOG_FORMAT.to_string(),
                message: format!("未知日志格式: {}", other),
            }),
        }
    }
}

/// 装载运行配置
///
/// 优先级: 默认值 < JSON 配置文件 < 环境变量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EtlConfig {
    /// 仓库数据库文件
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// 源文件目录
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default)]
    pub log_format: LogFormat,

    /// 装载顺序（缺省为标准 6 表计划）
    #[serde(default = "standard_plan")]
    pub plan: Vec<LoadJob>,
}

impl Default for EtlConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            data_dir: default_data_dir(),
            log_format: LogFormat::default(),
            plan: standard_plan(),
        }
    }
}

impl EtlConfig {
    /// 从 JSON 文件读取（缺失字段取默认值）
    pub fn from_file(path: &Path) -> ImportResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ImportError::ConfigReadError {
            key: path.display().to_string(),
            message: e.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|e| ImportError::ConfigReadError {
            key: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// 读取配置: 可选配置文件 + 进程环境变量
    pub fn load(path: Option<&Path>) -> ImportResult<Self> {
        let config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply_env_overrides_from(|key| std::env::var(key).ok())
    }

    /// 应用环境变量覆写（空值忽略）
    pub fn apply_env_overrides_from<F>(mut self, lookup: F) -> ImportResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(v) = non_empty(env_keys::DB_PATH) {
            self.db_path = PathBuf::from(v);
        }
        if let Some(v) = non_empty(env_keys::DATA_DIR) {
            self.data_dir = PathBuf::from(v);
        }
        if let Some(v) = non_empty(env_keys::LOG_FORMAT) {
            self.log_format = v.parse()?;
        }
        Ok(self)
    }

    /// 源路径解析到 data_dir 后的装载计划
    pub fn resolved_plan(&self) -> Vec<LoadJob> {
        self.plan
            .iter()
            .map(|job| job.resolved_against(&self.data_dir))
            .collect()
    }
}

/// 默认数据库路径: 用户数据目录下的 ds-etl/warehouse.db
fn default_db_path() -> PathBuf {
    match dirs::data_dir() {
        Some(dir) => dir.join("ds-etl").join("warehouse.db"),
        None => PathBuf::from("./warehouse.db"),
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_default_config() {
        let config = EtlConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.log_format, LogFormat::Text);
        assert_eq!(config.plan.len(), 6);
        assert!(config.db_path.ends_with("warehouse.db"));
    }

    #[test]
    fn test_from_file_partial() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"data_dir": "/srv/ds", "log_format": "json",
                "plan": [{{"source_path": "b.csv", "table_id": "DS.FT_BALANCE_F", "date_columns": ["ON_DATE"]}}]}}"#
        )
        .unwrap();

        let config = EtlConfig::from_file(file.path()).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/ds"));
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.plan.len(), 1);
        assert_eq!(
            config.resolved_plan()[0].source_path,
            PathBuf::from("/srv/ds/b.csv")
        );
    }

    #[test]
    fn test_from_file_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let result = EtlConfig::from_file(file.path());
        assert!(matches!(result, Err(ImportError::ConfigReadError { .. })));
    }

    #[test]
    fn test_from_file_missing() {
        let result = EtlConfig::from_file(Path::new("/nonexistent/ds-etl.json"));
        assert!(matches!(result, Err(ImportError::ConfigReadError { .. })));
    }

    #[test]
    fn test_env_overrides() {
        let vars = env(&[
            (env_keys::DB_PATH, "/tmp/dwh.db"),
            (env_keys::DATA_DIR, "  "),
            (env_keys::LOG_FORMAT, "JSON"),
        ]);

        let config = EtlConfig::default()
            .apply_env_overrides_from(|k| vars.get(k).cloned())
            .unwrap();

        assert_eq!(config.db_path, PathBuf::from("/tmp/dwh.db"));
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_env_invalid_log_format() {
        let vars = env(&[(env_keys::LOG_FORMAT, "xml")]);

        let result = EtlConfig::default().apply_env_overrides_from(|k| vars.get(k).cloned());
        assert!(matches!(
            result,
            Err(ImportError::ConfigReadError { ref key, .. }) if key == env_keys::LOG_FORMAT
        ));
    }
}
