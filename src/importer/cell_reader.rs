// ==========================================
// 谱系导入器 - 单元格读取与类型转换
// ==========================================
// 职责: NBSP 清除 / TRIM / 空值标准化 / 数值与日期解析
// 约定: 解析失败一律返回 None，不向上抛错
//       仅“按列名取值但列不存在”记录 GENERIC_MISSING_COLUMN
// ==========================================

use crate::domain::import_status::ImportStatus;
use crate::importer::result_collector::ImportResultCollector;
use crate::importer::workbook::{SheetCell, SheetRow};
use chrono::NaiveDate;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashMap;

const NBSP: char = '\u{00A0}';

/// 定点小数的固定精度
pub const DECIMAL_SCALE: u32 = 10;

/// 清洗单元格文本：去 NBSP、去首尾空白，空串视为无值
pub fn normalize_text(raw: &str) -> Option<String> {
    let stripped = raw.replace(NBSP, "");
    let trimmed = stripped.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// ==========================================
// 文本取值
// ==========================================

/// 按列下标取值；越界或空单元格返回 None
pub fn cell_value(row: &SheetRow, index: usize) -> Option<String> {
    row.cell(index)
        .and_then(SheetCell::raw_text)
        .and_then(normalize_text)
}

/// 按列名取值；列名不在映射中时记录缺列问题
pub fn cell_value_by_name(
    row: &SheetRow,
    column_index: &HashMap<String, usize>,
    column: &str,
    results: &mut ImportResultCollector,
) -> Option<String> {
    match column_index.get(column) {
        Some(&index) => cell_value(row, index),
        None => {
            results.record(
                ImportStatus::GenericMissingColumn,
                row.row_index(),
                format!("Column missing: '{}'", column),
            );
            None
        }
    }
}

/// 一行内所有物理单元格都为空（或只含空白/NBSP）
pub fn all_cells_empty(row: &SheetRow) -> bool {
    row.cells()
        .iter()
        .all(|cell| cell.raw_text().and_then(normalize_text).is_none())
}

// ==========================================
// 数值取值
// ==========================================

pub fn cell_value_integer(row: &SheetRow, index: usize) -> Option<i32> {
    cell_value(row, index)?.parse().ok()
}

pub fn cell_value_double(row: &SheetRow, index: usize) -> Option<f64> {
    cell_value(row, index)?.parse().ok()
}

/// 按 double 解析后转为定点小数，四舍五入（half-up）到 10 位
pub fn cell_value_decimal(row: &SheetRow, index: usize) -> Option<Decimal> {
    let value = cell_value_double(row, index)?;
    let decimal = Decimal::from_f64(value)?
        .round_dp_with_strategy(DECIMAL_SCALE, RoundingStrategy::MidpointAwayFromZero);
    let mut scaled = decimal;
    scaled.rescale(DECIMAL_SCALE);
    Some(scaled)
}

pub fn cell_value_integer_by_name(
    row: &SheetRow,
    column_index: &HashMap<String, usize>,
    column: &str,
    results: &mut ImportResultCollector,
) -> Option<i32> {
    cell_value_by_name(row, column_index, column, results)?.parse().ok()
}

pub fn cell_value_double_by_name(
    row: &SheetRow,
    column_index: &HashMap<String, usize>,
    column: &str,
    results: &mut ImportResultCollector,
) -> Option<f64> {
    cell_value_by_name(row, column_index, column, results)?.parse().ok()
}

// ==========================================
// 日期取值
// ==========================================

/// 日期精度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePrecision {
    Year,
    YearMonth,
    /// 年 + 日（月份缺失）
    YearDay,
    Full,
}

/// 可能缺月/缺日的日期
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartialDate {
    pub year: i32,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

impl PartialDate {
    pub fn precision(&self) -> DatePrecision {
        match (self.month, self.day) {
            (None, None) => DatePrecision::Year,
            (Some(_), None) => DatePrecision::YearMonth,
            (None, Some(_)) => DatePrecision::YearDay,
            (Some(_), Some(_)) => DatePrecision::Full,
        }
    }

    /// 缺失的月/日按 1 补齐
    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month.unwrap_or(1), self.day.unwrap_or(1))
    }
}

/// 解析日期文本
///
/// - 10 位: YYYY-MM-DD
/// - 其余: 先把 '-' 替换为 '0'，再按 YYYYMMDD 检查月、日是否为 00
pub fn parse_partial_date(value: &str) -> Option<PartialDate> {
    if value.chars().count() == 10 {
        let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
        return Some(full_date(date));
    }

    let digits = value.replace('-', "0");
    if digits.len() != 8 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let year: i32 = digits[0..4].parse().ok()?;
    let month = &digits[4..6];
    let day = &digits[6..8];
    let no_month = month == "00";
    let no_day = day == "00";

    let date = match (no_month, no_day) {
        (true, true) => PartialDate {
            year,
            month: None,
            day: None,
        },
        (false, true) => {
            let month: u32 = month.parse().ok()?;
            NaiveDate::from_ymd_opt(year, month, 1)?;
            PartialDate {
                year,
                month: Some(month),
                day: None,
            }
        }
        (true, false) => {
            let day: u32 = day.parse().ok()?;
            NaiveDate::from_ymd_opt(year, 1, day)?;
            PartialDate {
                year,
                month: None,
                day: Some(day),
            }
        }
        (false, false) => full_date(NaiveDate::parse_from_str(&digits, "%Y%m%d").ok()?),
    };

    Some(date)
}

fn full_date(date: NaiveDate) -> PartialDate {
    use chrono::Datelike;
    PartialDate {
        year: date.year(),
        month: Some(date.month()),
        day: Some(date.day()),
    }
}

pub fn cell_value_date(row: &SheetRow, index: usize) -> Option<PartialDate> {
    parse_partial_date(&cell_value(row, index)?)
}

pub fn cell_value_date_by_name(
    row: &SheetRow,
    column_index: &HashMap<String, usize>,
    column: &str,
    results: &mut ImportResultCollector,
) -> Option<PartialDate> {
    parse_partial_date(&cell_value_by_name(row, column_index, column, results)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn row(texts: &[&str]) -> SheetRow {
        SheetRow::from_texts(5, texts)
    }

    #[test]
    fn test_cell_value_normalization() {
        let r = row(&["  A-1  ", "\u{00A0}", " B\u{00A0}2 ", "   "]);
        assert_eq!(cell_value(&r, 0), Some("A-1".to_string()));
        assert_eq!(cell_value(&r, 1), None);
        assert_eq!(cell_value(&r, 2), Some("B2".to_string()));
        assert_eq!(cell_value(&r, 3), None);
        assert_eq!(cell_value(&r, 10), None);
    }

    #[test]
    fn test_cell_value_by_name_records_missing_column() {
        let r = row(&["A-1", "42"]);
        let columns: HashMap<String, usize> =
            [("ACCENUMB".to_string(), 0), ("Count".to_string(), 1)].into_iter().collect();
        let mut results = ImportResultCollector::new();

        assert_eq!(
            cell_value_by_name(&r, &columns, "ACCENUMB", &mut results),
            Some("A-1".to_string())
        );
        assert_eq!(cell_value_integer_by_name(&r, &columns, "Count", &mut results), Some(42));
        assert_eq!(cell_value_double_by_name(&r, &columns, "Count", &mut results), Some(42.0));
        assert_eq!(cell_value_date_by_name(&r, &columns, "Count", &mut results), None);
        assert!(!results.has_errors());

        assert_eq!(cell_value_by_name(&r, &columns, "Missing", &mut results), None);
        let entries = results.results();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].status, ImportStatus::GenericMissingColumn);
        assert_eq!(entries[0].row_index, 5);
        assert_eq!(entries[0].message.as_deref(), Some("Column missing: 'Missing'"));
    }

    #[test]
    fn test_numeric_parsing_returns_none_on_failure() {
        let r = row(&["12", "abc", "3.25", "1.5e2", ""]);
        assert_eq!(cell_value_integer(&r, 0), Some(12));
        assert_eq!(cell_value_integer(&r, 1), None);
        assert_eq!(cell_value_integer(&r, 2), None);
        assert_eq!(cell_value_double(&r, 2), Some(3.25));
        assert_eq!(cell_value_double(&r, 3), Some(150.0));
        assert_eq!(cell_value_double(&r, 4), None);
    }

    #[test]
    fn test_decimal_fixed_scale() {
        let r = row(&["2.5", "x"]);
        let value = cell_value_decimal(&r, 0).unwrap();
        assert_eq!(value.scale(), DECIMAL_SCALE);
        assert_eq!(value, Decimal::from_str("2.5").unwrap());
        assert_eq!(cell_value_decimal(&r, 1), None);
    }

    #[test]
    fn test_date_full_with_dashes() {
        let date = parse_partial_date("2023-05-04").unwrap();
        assert_eq!(date.precision(), DatePrecision::Full);
        assert_eq!(date.to_naive_date(), NaiveDate::from_ymd_opt(2023, 5, 4));
    }

    #[test]
    fn test_date_year_month() {
        let date = parse_partial_date("20230500").unwrap();
        assert_eq!(date.precision(), DatePrecision::YearMonth);
        assert_eq!(date.year, 2023);
        assert_eq!(date.month, Some(5));
        assert_eq!(date.day, None);
        assert_eq!(date.to_naive_date(), NaiveDate::from_ymd_opt(2023, 5, 1));

        // '-' 替换为 '0' 后与 20230500 等价
        assert_eq!(parse_partial_date("202305--"), Some(date));
    }

    #[test]
    fn test_date_year_only_and_year_day() {
        let year = parse_partial_date("20230000").unwrap();
        assert_eq!(year.precision(), DatePrecision::Year);
        assert_eq!(parse_partial_date("2023----"), Some(year));

        let year_day = parse_partial_date("20230017").unwrap();
        assert_eq!(year_day.precision(), DatePrecision::YearDay);
        assert_eq!(year_day.day, Some(17));
        assert_eq!(year_day.to_naive_date(), NaiveDate::from_ymd_opt(2023, 1, 17));
    }

    #[test]
    fn test_date_full_compact_and_invalid() {
        let date = parse_partial_date("19991231").unwrap();
        assert_eq!(date.to_naive_date(), NaiveDate::from_ymd_opt(1999, 12, 31));

        assert_eq!(parse_partial_date("2023-13-01"), None);
        assert_eq!(parse_partial_date("20231301"), None);
        assert_eq!(parse_partial_date("2023"), None);
        assert_eq!(parse_partial_date("not a date"), None);
    }

    #[test]
    fn test_cell_value_date() {
        let r = row(&[" 2023-05-04 ", "junk"]);
        assert_eq!(
            cell_value_date(&r, 0).and_then(|d| d.to_naive_date()),
            NaiveDate::from_ymd_opt(2023, 5, 4)
        );
        assert_eq!(cell_value_date(&r, 1), None);
    }

    #[test]
    fn test_all_cells_empty() {
        assert!(all_cells_empty(&row(&[])));
        assert!(all_cells_empty(&row(&["", "  ", "\u{00A0}"])));
        assert!(!all_cells_empty(&row(&["", "x"])));
    }
}
