// ==========================================
// 谱系导入器 - 工作表模板校验
// ==========================================
// 职责: 表头行（首行）与模板列名逐列比对
// 规则: 列名区分大小写，比较前只做 NBSP 清除与 TRIM
// ==========================================

use crate::domain::import_status::ImportStatus;
use crate::importer::cell_reader::cell_value;
use crate::importer::result_collector::ImportResultCollector;
use crate::importer::workbook::SheetRow;

/// 表头问题统一锚定在第 1 行
pub const HEADER_ROW_INDEX: i64 = 1;

/// 工作表模板：名称 + 有序列名
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetTemplate {
    pub name: &'static str,
    pub columns: &'static [&'static str],
}

impl SheetTemplate {
    pub const fn new(name: &'static str, columns: &'static [&'static str]) -> Self {
        Self { name, columns }
    }

    /// 表头至少需要的物理单元格数
    pub fn min_cell_count(&self) -> usize {
        self.columns.len()
    }

    /// 校验表头；返回是否完全匹配
    pub fn check_headers(&self, header: &SheetRow, results: &mut ImportResultCollector) -> bool {
        if header.physical_cell_count() < self.min_cell_count() {
            results.record(
                ImportStatus::GenericMissingColumn,
                HEADER_ROW_INDEX,
                format!("Headers in {} sheet don't match template.", self.name),
            );
            return false;
        }

        let mut matched = true;
        for (index, expected) in self.columns.iter().enumerate() {
            if cell_value(header, index).as_deref() != Some(*expected) {
                results.record(
                    ImportStatus::GenericMissingColumn,
                    HEADER_ROW_INDEX,
                    expected.to_string(),
                );
                matched = false;
            }
        }
        matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: SheetTemplate = SheetTemplate::new("DEMO", &["ACCENUMB", "Name", "Author"]);

    #[test]
    fn test_matching_headers() {
        let header = SheetRow::from_texts(1, &[" ACCENUMB ", "Name\u{00A0}", "Author", "extra"]);
        let mut results = ImportResultCollector::new();
        assert!(TEMPLATE.check_headers(&header, &mut results));
        assert!(!results.has_errors());
    }

    #[test]
    fn test_too_few_cells() {
        let header = SheetRow::from_texts(1, &["ACCENUMB", "Name"]);
        let mut results = ImportResultCollector::new();
        assert!(!TEMPLATE.check_headers(&header, &mut results));
        let entry = results.get(ImportStatus::GenericMissingColumn).unwrap();
        assert_eq!(entry.row_index, 1);
        assert_eq!(
            entry.message.as_deref(),
            Some("Headers in DEMO sheet don't match template.")
        );
    }

    #[test]
    fn test_mismatches_collapse_to_one_entry() {
        let header = SheetRow::from_texts(1, &["accenumb", "Nam", "Author"]);
        let mut results = ImportResultCollector::new();
        assert!(!TEMPLATE.check_headers(&header, &mut results));
        assert_eq!(results.len(), 1);
        // 第一个不匹配的列名胜出
        assert_eq!(
            results.get(ImportStatus::GenericMissingColumn).unwrap().message.as_deref(),
            Some("ACCENUMB")
        );
    }
}
