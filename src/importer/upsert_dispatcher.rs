// ==========================================
// DS 数据仓库装载 - 插入/更新分发器
// ==========================================
// 职责: 按表规格把一行源数据绑定为参数并执行对应语句
// - Upsert: INSERT ... ON CONFLICT (冲突键) DO UPDATE SET 更新列
// - TruncateAndAppend: 普通 INSERT（清表由调用方在行循环前完成一次）
// 约束: 语句覆盖规格的全部列,可选列缺失时绑定默认值,保证语句形状稳定
// ==========================================

use crate::domain::table_spec::{ColumnDefault, ColumnKind, ColumnSpec, ReloadStrategy, TableSpec};
use crate::domain::value::CellValue;
use crate::importer::date_normalizer::DateNormalizer;
use crate::importer::error::RowRejection;
use crate::importer::file_parser::SourceRow;
use rusqlite::{params_from_iter, Connection};

#[derive(Debug, Clone, Copy, Default)]
pub struct UpsertDispatcher {
    normalizer: DateNormalizer,
}

impl UpsertDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// 生成规格对应的写入语句
    pub fn build_statement(spec: &TableSpec) -> String {
        let columns: Vec<&str> = spec.columns.iter().map(|c| c.target).collect();
        let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();

        let insert = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            spec.target_table,
            columns.join(", "),
            placeholders.join(", ")
        );

        match spec.reload_strategy {
            ReloadStrategy::TruncateAndAppend => insert,
            ReloadStrategy::Upsert if spec.update_on_conflict.is_empty() => format!(
                "{} ON CONFLICT ({}) DO NOTHING",
                insert,
                spec.conflict_key.join(", ")
            ),
            ReloadStrategy::Upsert => {
                let assignments: Vec<String> = spec
                    .update_on_conflict
                    .iter()
                    .map(|c| format!("{} = excluded.{}", c, c))
                    .collect();
                format!(
                    "{} ON CONFLICT ({}) DO UPDATE SET {}",
                    insert,
                    spec.conflict_key.join(", "),
                    assignments.join(", ")
                )
            }
        }
    }

    /// 按规格列顺序生成绑定参数
    ///
    /// # 返回
    /// - Ok(values): 与 build_statement 的占位符一一对应
    /// - Err(RowRejection): 必填列缺失或类型转换失败,该行不会触达数据库
    pub fn bind_values(
        &self,
        spec: &TableSpec,
        row: &SourceRow,
    ) -> Result<Vec<CellValue>, RowRejection> {
        spec.columns
            .iter()
            .map(|col| match row.get(col.source).map(str::trim) {
                Some(raw) if !raw.is_empty() => self.coerce(col, raw),
                _ if col.required => Err(RowRejection::MissingRequired {
                    column: col.source.to_string(),
                }),
                _ => Ok(default_value(col.default)),
            })
            .collect()
    }

    /// 写入一行
    pub fn apply(
        &self,
        conn: &Connection,
        spec: &TableSpec,
        row: &SourceRow,
    ) -> Result<(), RowRejection> {
        let values = self.bind_values(spec, row)?;
        let sql = Self::build_statement(spec);

        let mut stmt = conn.prepare_cached(&sql)?;
        stmt.execute(params_from_iter(values.iter()))?;
        Ok(())
    }

    /// 清空目标表
    pub fn truncate(&self, conn: &Connection, spec: &TableSpec) -> rusqlite::Result<usize> {
        conn.execute(&format!("DELETE FROM {}", spec.target_table), [])
    }

    fn coerce(&self, col: &ColumnSpec, raw: &str) -> Result<CellValue, RowRejection> {
        let rejected = |expected: &'static str| RowRejection::TypeConversion {
            column: col.source.to_string(),
            value: raw.to_string(),
            expected,
        };

        match col.kind {
            ColumnKind::Date => self
                .normalizer
                .normalize(raw)
                .map(CellValue::Date)
                .map_err(|_| rejected("日期")),
            ColumnKind::Integer => CellValue::parse_integer(raw)
                .map(CellValue::Integer)
                .ok_or_else(|| rejected("整数")),
            ColumnKind::Decimal => CellValue::parse_decimal(raw)
                .map(CellValue::Decimal)
                .ok_or_else(|| rejected("数值")),
            ColumnKind::Text => Ok(CellValue::Text(raw.to_string())),
        }
    }
}

fn default_value(default: ColumnDefault) -> CellValue {
    match default {
        ColumnDefault::Null => CellValue::Null,
        ColumnDefault::Integer(v) => CellValue::Integer(v),
        ColumnDefault::Decimal(v) => CellValue::Decimal(v),
    }
}
