// ==========================================
// DS 数据仓库装载 - 归一化单元格值
// ==========================================
// 职责: 源文本 → 日期 / 整数 / 数值 / 文本 / NULL
// ==========================================

use chrono::NaiveDate;
use rusqlite::types::{Null, ToSql, ToSqlOutput};

/// 单元格归一化后的值（仅在一行分发期间存活）
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Date(NaiveDate),
    Integer(i64),
    Decimal(f64),
    Text(String),
    Null,
}

impl CellValue {
    /// 解析整数（兼容 "810.0" 这类导出工具写出的整数值）
    ///
    /// 超出 i64 范围、科学计数法、非零小数部分均视为无法转换
    pub fn parse_integer(raw: &str) -> Option<i64> {
        let value = raw.trim();
        let (int_part, frac_part) = match value.split_once('.') {
            Some((int_part, frac_part)) => (int_part, Some(frac_part)),
            None => (value, None),
        };

        if let Some(frac) = frac_part {
            if frac.is_empty() || !frac.bytes().all(|b| b == b'0') {
                return None;
            }
        }
        int_part.parse::<i64>().ok()
    }

    /// 解析数值（兼容逗号小数点与千分位空格）
    pub fn parse_decimal(raw: &str) -> Option<f64> {
        let compact: String = raw
            .trim()
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '\u{a0}')
            .collect();
        let normalized = if compact.contains('.') {
            compact
        } else {
            compact.replace(',', ".")
        };
        normalized.parse::<f64>().ok().filter(|v| v.is_finite())
    }
}

impl ToSql for CellValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            CellValue::Date(d) => d.to_sql(),
            CellValue::Integer(v) => Ok(ToSqlOutput::from(*v)),
            CellValue::Decimal(v) => Ok(ToSqlOutput::from(*v)),
            CellValue::Text(s) => Ok(ToSqlOutput::from(s.as_str())),
            CellValue::Null => Ok(ToSqlOutput::from(Null)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_integer() {
        assert_eq!(CellValue::parse_integer("810"), Some(810));
        assert_eq!(CellValue::parse_integer(" 840 "), Some(840));
        assert_eq!(CellValue::parse_integer("810.0"), Some(810));
        assert_eq!(CellValue::parse_integer("810.5"), None);
        assert_eq!(CellValue::parse_integer("abc"), None);
        assert_eq!(CellValue::parse_integer("-7.00"), Some(-7));
        assert_eq!(CellValue::parse_integer("810."), None);
    }

    #[test]
    fn test_parse_integer_out_of_range_rejected() {
        assert_eq!(CellValue::parse_integer("99999999999999999999"), None);
        assert_eq!(CellValue::parse_integer("99999999999999999999.0"), None);
        assert_eq!(CellValue::parse_integer("1e19"), None);
        assert_eq!(CellValue::parse_integer("1e3"), None);
        assert_eq!(
            CellValue::parse_integer("9223372036854775807"),
            Some(i64::MAX)
        );
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(CellValue::parse_decimal("1000.00"), Some(1000.0));
        assert_eq!(CellValue::parse_decimal("1000,50"), Some(1000.5));
        assert_eq!(CellValue::parse_decimal("1 000,50"), Some(1000.5));
        assert_eq!(CellValue::parse_decimal("-12.5"), Some(-12.5));
        assert_eq!(CellValue::parse_decimal("n/a"), None);
        assert_eq!(CellValue::parse_decimal("NaN"), None);
    }

    #[test]
    fn test_to_sql_date_as_iso_text() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let value = CellValue::Date(NaiveDate::from_ymd_opt(2018, 1, 31).unwrap());
        let stored: String = conn
            .query_row("SELECT ?1", [&value], |row| row.get(0))
            .unwrap();
        assert_eq!(stored, "2018-01-31");
    }

    #[test]
    fn test_to_sql_null() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let stored: Option<f64> = conn
            .query_row("SELECT ?1", [&CellValue::Null], |row| row.get(0))
            .unwrap();
        assert_eq!(stored, None);
    }
}
