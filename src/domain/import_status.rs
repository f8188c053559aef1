// ==========================================
// 谱系导入器 - 导入结果类型
// ==========================================
// 职责: 定义校验/导入问题的状态种类与结果条目
// 输出格式: JSON {status, rowIndex, message}
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// 文件级问题使用的行号
pub const FILE_LEVEL_ROW: i64 = -1;

// ==========================================
// 导入状态种类 (Import Status)
// ==========================================
// 同一种类在一次运行中只保留首次出现的条目
// 序列化格式: SCREAMING_SNAKE_CASE
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImportStatus {
    GenericMissingExcelSheet,
    GenericMissingColumn,
    GenericInvalidGermplasm,
    GenericMissingRequiredValue,
    GenericIoError,
}

impl fmt::Display for ImportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ImportStatus::GenericMissingExcelSheet => "GENERIC_MISSING_EXCEL_SHEET",
            ImportStatus::GenericMissingColumn => "GENERIC_MISSING_COLUMN",
            ImportStatus::GenericInvalidGermplasm => "GENERIC_INVALID_GERMPLASM",
            ImportStatus::GenericMissingRequiredValue => "GENERIC_MISSING_REQUIRED_VALUE",
            ImportStatus::GenericIoError => "GENERIC_IO_ERROR",
        };
        write!(f, "{}", s)
    }
}

// ==========================================
// 导入结果条目 (Import Result Entry)
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResultEntry {
    pub status: ImportStatus,
    /// 1 起始的行号；文件级问题为 -1
    pub row_index: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ImportResultEntry {
    pub fn new(status: ImportStatus, row_index: i64, message: Option<String>) -> Self {
        Self {
            status,
            row_index,
            message,
        }
    }
}
