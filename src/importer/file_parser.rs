// ==========================================
// DS 数据仓库装载 - 源文件解析器实现
// ==========================================
// 格式: 分隔文本, 分隔符 ';', UTF-8, 首行为表头
// 约定: 列名匹配大小写不敏感,单元格去首尾空白
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::loader_trait::SourceParser;
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;

/// 源文件默认分隔符
pub const DEFAULT_DELIMITER: u8 = b';';

// ==========================================
// SourceRow - 源文件中的一行
// ==========================================
// 按表头顺序保存 (大写列名, 原始文本)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRow {
    pub row_number: usize, // 数据行号（从 1 开始,不含表头）
    cells: Vec<(String, String)>,
}

impl SourceRow {
    pub fn new(row_number: usize, cells: Vec<(String, String)>) -> Self {
        let cells = cells
            .into_iter()
            .map(|(k, v)| (k.trim().to_uppercase(), v))
            .collect();
        Self { row_number, cells }
    }

    /// 读取单元格（大小写不敏感）
    pub fn get(&self, column: &str) -> Option<&str> {
        let key = column.trim();
        self.cells
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// 覆盖已有单元格的值,列不存在时返回 false
    pub fn set(&mut self, column: &str, value: String) -> bool {
        let key = column.trim();
        match self.cells.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(key)) {
            Some((_, v)) => {
                *v = value;
                true
            }
            None => false,
        }
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(k, _)| k.as_str())
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|(_, v)| v.trim().is_empty())
    }
}

// ==========================================
// SourceTable - 解析结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceTable {
    pub headers: Vec<String>, // 大写列名
    pub rows: Vec<SourceRow>,
}

impl SourceTable {
    pub fn has_column(&self, column: &str) -> bool {
        let key = column.trim();
        self.headers.iter().any(|h| h.eq_ignore_ascii_case(key))
    }
}

// ==========================================
// CsvSourceParser 实现
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct CsvSourceParser {
    delimiter: u8,
}

impl Default for CsvSourceParser {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
        }
    }
}

impl CsvSourceParser {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SourceParser for CsvSourceParser {
    fn parse(&self, file_path: &Path) -> ImportResult<SourceTable> {
        // 检查文件存在
        if !file_path.is_file() {
            return Err(ImportError::FileNotFound(file_path.display().to_string()));
        }

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true) // 允许行长度不一致,缺失单元格按列缺失处理
            .from_reader(file);

        // 读取表头
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_uppercase())
            .collect();

        // 读取所有行
        let mut rows = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            let record = result?;
            let cells = record
                .iter()
                .enumerate()
                .filter_map(|(col_idx, value)| {
                    headers
                        .get(col_idx)
                        .map(|h| (h.clone(), value.trim().to_string()))
                })
                .collect();

            let row = SourceRow::new(row_idx + 1, cells);

            // 跳过完全空白的行
            if row.is_blank() {
                continue;
            }

            rows.push(row);
        }

        Ok(SourceTable { headers, rows })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_semicolon_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "ON_DATE;ACCOUNT_RK;CURRENCY_RK;BALANCE_OUT").unwrap();
        writeln!(temp_file, "31.01.2018;1;810;1000.00").unwrap();
        writeln!(temp_file, "31-01-2018;2;840;").unwrap();

        let table = CsvSourceParser::new().parse(temp_file.path()).unwrap();

        assert_eq!(
            table.headers,
            vec!["ON_DATE", "ACCOUNT_RK", "CURRENCY_RK", "BALANCE_OUT"]
        );
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].get("ON_DATE"), Some("31.01.2018"));
        assert_eq!(table.rows[1].get("BALANCE_OUT"), Some(""));
        assert_eq!(table.rows[1].row_number, 2);
    }

    #[test]
    fn test_headers_case_insensitive() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "on_date; Account_Rk ").unwrap();
        writeln!(temp_file, "31.01.2018;7").unwrap();

        let table = CsvSourceParser::new().parse(temp_file.path()).unwrap();

        assert!(table.has_column("ACCOUNT_RK"));
        assert!(table.has_column("on_date"));
        assert_eq!(table.rows[0].get("account_rk"), Some("7"));
    }

    #[test]
    fn test_short_row_has_missing_cells() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "A;B;C").unwrap();
        writeln!(temp_file, "1;2").unwrap();

        let table = CsvSourceParser::new().parse(temp_file.path()).unwrap();

        assert_eq!(table.rows[0].get("B"), Some("2"));
        assert_eq!(table.rows[0].get("C"), None);
    }

    #[test]
    fn test_skip_blank_rows() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "A;B").unwrap();
        writeln!(temp_file, "1;2").unwrap();
        writeln!(temp_file, ";").unwrap();
        writeln!(temp_file, "3;4").unwrap();

        let table = CsvSourceParser::new().parse(temp_file.path()).unwrap();

        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1].get("A"), Some("3"));
    }

    #[test]
    fn test_utf8_bom_header() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all("\u{feff}ON_DATE;ACCOUNT_RK\n".as_bytes()).unwrap();
        writeln!(temp_file, "31.01.2018;1").unwrap();

        let table = CsvSourceParser::new().parse(temp_file.path()).unwrap();

        assert!(table.has_column("ON_DATE"));
    }

    #[test]
    fn test_file_not_found() {
        let result = CsvSourceParser::new().parse(Path::new("non_existent.csv"));
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_row_set_overwrites_value() {
        let mut row = SourceRow::new(1, vec![("on_date".to_string(), "31.01.2018".to_string())]);
        assert!(row.set("ON_DATE", "2018-01-31".to_string()));
        assert_eq!(row.get("on_date"), Some("2018-01-31"));
        assert!(!row.set("MISSING", "x".to_string()));
    }
}
