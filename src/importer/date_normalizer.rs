// ==========================================
// DS 数据仓库装载 - 日期归一化
// ==========================================
// 规则: 按固定顺序尝试候选格式,首个成功即返回,不再尝试后续格式
//   1. DD.MM.YYYY（日在前）
//   2. DD-MM-YYYY（日在前）
//   3. 与区域设置无关的自动识别
// 约束: %Y 可匹配 1~4 位数字,四位格式的结果年份不足四位时视为不匹配
// ==========================================

use crate::importer::error::DateParseError;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

#[derive(Debug, Clone, Copy)]
enum DateCandidate {
    Date(&'static str),
    DateTime(&'static str),
    Rfc3339,
}

impl DateCandidate {
    fn parse(&self, value: &str) -> Option<NaiveDate> {
        let parsed = match self {
            DateCandidate::Date(fmt) => NaiveDate::parse_from_str(value, fmt).ok(),
            DateCandidate::DateTime(fmt) => NaiveDateTime::parse_from_str(value, fmt)
                .ok()
                .map(|dt| dt.date()),
            DateCandidate::Rfc3339 => DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.date_naive()),
        };
        parsed.filter(|date| date.year() >= MIN_YEAR)
    }
}

/// 短年份（如 "31.01.18" 中的 18）不会被四位年份格式吞掉
const MIN_YEAR: i32 = 1000;

/// 源文件约定的日在前格式
const DAY_FIRST_CANDIDATES: &[DateCandidate] = &[
    DateCandidate::Date("%d.%m.%Y"),
    DateCandidate::Date("%d-%m-%Y"),
];

/// 自动识别: ISO 系列优先,斜杠格式按月在前,月在前不成立时退回日在前
const AUTO_CANDIDATES: &[DateCandidate] = &[
    DateCandidate::Rfc3339,
    DateCandidate::Date("%Y-%m-%d"),
    DateCandidate::DateTime("%Y-%m-%d %H:%M:%S"),
    DateCandidate::DateTime("%Y-%m-%dT%H:%M:%S"),
    DateCandidate::DateTime("%Y-%m-%d %H:%M:%S%.f"),
    DateCandidate::Date("%Y/%m/%d"),
    DateCandidate::Date("%Y.%m.%d"),
    DateCandidate::Date("%Y%m%d"),
    DateCandidate::DateTime("%d.%m.%Y %H:%M:%S"),
    DateCandidate::DateTime("%d.%m.%Y %H:%M"),
    DateCandidate::Date("%d.%m.%y"),
    DateCandidate::Date("%d-%m-%y"),
    DateCandidate::Date("%m/%d/%Y"),
    DateCandidate::Date("%d/%m/%Y"),
    DateCandidate::Date("%d %B %Y"),
    DateCandidate::Date("%d %b %Y"),
    DateCandidate::Date("%B %d, %Y"),
    DateCandidate::Date("%b %d, %Y"),
];

// ==========================================
// DateNormalizer - 日期归一化器（纯函数,无副作用）
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct DateNormalizer;

impl DateNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// 将原始日期文本解析为日历日期
    ///
    /// # 返回
    /// - Ok(NaiveDate): 第一个匹配的候选格式的解析结果
    /// - Err(DateParseError): 所有候选均失败,携带原始值
    pub fn normalize(&self, raw: &str) -> Result<NaiveDate, DateParseError> {
        let value = raw.trim();
        if value.is_empty() {
            return Err(DateParseError {
                value: raw.to_string(),
            });
        }

        DAY_FIRST_CANDIDATES
            .iter()
            .chain(AUTO_CANDIDATES.iter())
            .find_map(|candidate| candidate.parse(value))
            .ok_or_else(|| DateParseError {
                value: raw.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_dotted_is_day_first() {
        let normalizer = DateNormalizer::new();
        assert_eq!(normalizer.normalize("03.04.2020").unwrap(), ymd(2020, 4, 3));
        assert_eq!(normalizer.normalize("31.01.2018").unwrap(), ymd(2018, 1, 31));
    }

    #[test]
    fn test_dashed_is_day_first() {
        let normalizer = DateNormalizer::new();
        assert_eq!(normalizer.normalize("03-04-2020").unwrap(), ymd(2020, 4, 3));
        assert_eq!(normalizer.normalize("31-01-2018").unwrap(), ymd(2018, 1, 31));
    }

    #[test]
    fn test_day_first_for_every_day_of_year() {
        let normalizer = DateNormalizer::new();
        let mut day = ymd(2019, 1, 1);
        while day < ymd(2020, 1, 1) {
            let dotted = day.format("%d.%m.%Y").to_string();
            let dashed = day.format("%d-%m-%Y").to_string();
            assert_eq!(normalizer.normalize(&dotted).unwrap(), day, "{}", dotted);
            assert_eq!(normalizer.normalize(&dashed).unwrap(), day, "{}", dashed);
            day = day.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_two_digit_year_not_read_as_four_digit() {
        let normalizer = DateNormalizer::new();
        assert_eq!(normalizer.normalize("31.01.18").unwrap(), ymd(2018, 1, 31));
        assert_eq!(normalizer.normalize("31-01-18").unwrap(), ymd(2018, 1, 31));
        assert_eq!(normalizer.normalize("03.04.20").unwrap(), ymd(2020, 4, 3));
    }

    #[test]
    fn test_short_year_never_stored_before_year_1000() {
        let normalizer = DateNormalizer::new();
        for raw in ["31.01.18", "31-01-18", "31.01.018", "5.5.5"] {
            if let Ok(date) = normalizer.normalize(raw) {
                assert!(date.year() >= 1000, "{} -> {}", raw, date);
            }
        }
    }

    #[test]
    fn test_trims_whitespace() {
        let normalizer = DateNormalizer::new();
        assert_eq!(normalizer.normalize("  15.01.2018 ").unwrap(), ymd(2018, 1, 15));
    }

    #[test]
    fn test_auto_detection_iso() {
        let normalizer = DateNormalizer::new();
        assert_eq!(normalizer.normalize("2018-01-15").unwrap(), ymd(2018, 1, 15));
        assert_eq!(
            normalizer.normalize("2018-01-15 10:30:00").unwrap(),
            ymd(2018, 1, 15)
        );
        assert_eq!(
            normalizer.normalize("2018-01-15T10:30:00+03:00").unwrap(),
            ymd(2018, 1, 15)
        );
        assert_eq!(normalizer.normalize("20180115").unwrap(), ymd(2018, 1, 15));
    }

    #[test]
    fn test_auto_detection_slash_month_first_then_day_first() {
        let normalizer = DateNormalizer::new();
        assert_eq!(normalizer.normalize("04/03/2020").unwrap(), ymd(2020, 4, 3));
        // 13 不可能是月份,退回日在前
        assert_eq!(normalizer.normalize("13/04/2020").unwrap(), ymd(2020, 4, 13));
    }

    #[test]
    fn test_auto_detection_textual() {
        let normalizer = DateNormalizer::new();
        assert_eq!(normalizer.normalize("15 January 2018").unwrap(), ymd(2018, 1, 15));
        assert_eq!(normalizer.normalize("Jan 15, 2018").unwrap(), ymd(2018, 1, 15));
    }

    #[test]
    fn test_dotted_with_time() {
        let normalizer = DateNormalizer::new();
        assert_eq!(
            normalizer.normalize("31.12.2018 00:00:00").unwrap(),
            ymd(2018, 12, 31)
        );
    }

    #[test]
    fn test_unparseable_carries_original_token() {
        let normalizer = DateNormalizer::new();
        let err = normalizer.normalize("not-a-date").unwrap_err();
        assert_eq!(err.value, "not-a-date");

        let err = normalizer.normalize("32.13.2018").unwrap_err();
        assert_eq!(err.value, "32.13.2018");

        assert!(normalizer.normalize("   ").is_err());
    }
}
