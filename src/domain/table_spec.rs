// ==========================================
// DS 数据仓库装载 - 目标表规格领域模型
// ==========================================
// 职责: 描述每张目标表的列、必填性、默认值、冲突键、更新列与重载策略
// 约束: 静态配置,进程启动后不可变
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// ColumnKind - 列类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColumnKind {
    Date,    // 日历日期 (存储为 YYYY-MM-DD)
    Integer, // 整数 (账户/币种代理键等)
    Decimal, // 数值 (余额/金额/汇率)
    Text,    // 原样透传
}

impl ColumnKind {
    /// SQLite 列类型
    pub fn sql_type(&self) -> &'static str {
        match self {
            ColumnKind::Date => "TEXT",
            ColumnKind::Integer => "INTEGER",
            ColumnKind::Decimal => "REAL",
            ColumnKind::Text => "TEXT",
        }
    }
}

// ==========================================
// ColumnDefault - 可选列缺失时的默认值
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnDefault {
    Null,
    Integer(i64),
    Decimal(f64),
}

// ==========================================
// ColumnSpec - 单列规格
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnSpec {
    pub source: &'static str, // 源文件列名 (大写)
    pub target: &'static str, // 目标表列名
    pub kind: ColumnKind,
    pub required: bool,
    pub default: ColumnDefault,
}

impl ColumnSpec {
    /// 必填列: 缺失或为空时整行拒绝
    pub const fn required(source: &'static str, target: &'static str, kind: ColumnKind) -> Self {
        Self {
            source,
            target,
            kind,
            required: true,
            default: ColumnDefault::Null,
        }
    }

    /// 可选列: 缺失或为空时取默认值 (默认 NULL)
    pub const fn optional(source: &'static str, target: &'static str, kind: ColumnKind) -> Self {
        Self {
            source,
            target,
            kind,
            required: false,
            default: ColumnDefault::Null,
        }
    }

    pub const fn with_default(mut self, default: ColumnDefault) -> Self {
        self.default = default;
        self
    }
}

// ==========================================
// ReloadStrategy - 重载策略
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReloadStrategy {
    /// 按冲突键插入或更新
    Upsert,
    /// 装载前清空目标表,逐行追加
    TruncateAndAppend,
}

// ==========================================
// TableSpec - 目标表规格
// ==========================================
// 冲突键与更新列均使用目标列名
#[derive(Debug, Clone, PartialEq)]
pub struct TableSpec {
    pub table_id: &'static str,     // 逻辑表标识 (如 DS.FT_BALANCE_F)
    pub target_table: &'static str, // 物理表名
    pub columns: &'static [ColumnSpec],
    pub conflict_key: &'static [&'static str],
    pub update_on_conflict: &'static [&'static str],
    pub reload_strategy: ReloadStrategy,
}

impl TableSpec {
    /// 按目标列名查找列规格
    pub fn column(&self, target: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.target == target)
    }

    /// 按源列名查找列规格（大小写不敏感）
    pub fn column_by_source(&self, source: &str) -> Option<&ColumnSpec> {
        self.columns
            .iter()
            .find(|c| c.source.eq_ignore_ascii_case(source.trim()))
    }

    pub fn required_columns(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.columns.iter().filter(|c| c.required)
    }

    /// 校验规格不变量
    ///
    /// - 冲突键 ⊆ 必填列
    /// - 更新列 ⊆ 全部列,且与冲突键不相交
    /// - 追加型表没有冲突键与更新列
    pub fn validate(&self) -> Result<(), String> {
        for key in self.conflict_key {
            match self.column(key) {
                Some(col) if col.required => {}
                Some(_) => {
                    return Err(format!("{}: 冲突键列 {} 不是必填列", self.table_id, key));
                }
                None => {
                    return Err(format!("{}: 冲突键列 {} 未定义", self.table_id, key));
                }
            }
        }

        for col in self.update_on_conflict {
            if self.column(col).is_none() {
                return Err(format!("{}: 更新列 {} 未定义", self.table_id, col));
            }
            if self.conflict_key.contains(col) {
                return Err(format!("{}: 更新列 {} 与冲突键重叠", self.table_id, col));
            }
        }

        match self.reload_strategy {
            ReloadStrategy::Upsert if self.conflict_key.is_empty() => {
                Err(format!("{}: upsert 策略缺少冲突键", self.table_id))
            }
            ReloadStrategy::TruncateAndAppend
                if !self.conflict_key.is_empty() || !self.update_on_conflict.is_empty() =>
            {
                Err(format!("{}: 追加型表不应定义冲突键", self.table_id))
            }
            _ => Ok(()),
        }
    }

    /// 生成建表语句（列定义与主键均来自规格本身）
    pub fn create_table_sql(&self) -> String {
        let mut defs: Vec<String> = self
            .columns
            .iter()
            .map(|c| {
                if c.required {
                    format!("{} {} NOT NULL", c.target, c.kind.sql_type())
                } else {
                    format!("{} {}", c.target, c.kind.sql_type())
                }
            })
            .collect();

        if !self.conflict_key.is_empty() {
            defs.push(format!("PRIMARY KEY ({})", self.conflict_key.join(", ")));
        }

        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n    {}\n)",
            self.target_table,
            defs.join(",\n    ")
        )
    }
}
