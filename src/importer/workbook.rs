// ==========================================
// 谱系导入器 - 工作簿读取
// ==========================================
// 支持: Excel (.xlsx/.xlsm/.xls/.xlsb) / ODS
// 职责: 按工作表名称产出文本单元格行
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

// ==========================================
// 单元格与行
// ==========================================

/// 物理单元格
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetCell {
    Empty,
    Text(String),
}

impl SheetCell {
    fn from_data(data: &Data) -> Self {
        match data {
            Data::Empty => SheetCell::Empty,
            Data::String(s) => SheetCell::Text(s.clone()),
            other => SheetCell::Text(other.to_string()),
        }
    }

    /// 原始文本（未清洗）；空单元格为 None
    pub fn raw_text(&self) -> Option<&str> {
        match self {
            SheetCell::Empty => None,
            SheetCell::Text(s) => Some(s.as_str()),
        }
    }
}

/// 表格中的一行
///
/// `row_number` 为工作表中的 1 起始行号；`cells` 去掉了行尾的空单元格，
/// 其长度即物理单元格数。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow {
    pub row_number: u32,
    cells: Vec<SheetCell>,
}

impl SheetRow {
    pub fn new(row_number: u32, mut cells: Vec<SheetCell>) -> Self {
        while matches!(cells.last(), Some(SheetCell::Empty)) {
            cells.pop();
        }
        Self { row_number, cells }
    }

    /// 由字符串构造（空串视为空单元格）
    pub fn from_texts<S: AsRef<str>>(row_number: u32, texts: &[S]) -> Self {
        let cells = texts
            .iter()
            .map(|t| match t.as_ref() {
                "" => SheetCell::Empty,
                s => SheetCell::Text(s.to_string()),
            })
            .collect();
        Self::new(row_number, cells)
    }

    pub fn cell(&self, index: usize) -> Option<&SheetCell> {
        self.cells.get(index)
    }

    pub fn cells(&self) -> &[SheetCell] {
        &self.cells
    }

    pub fn physical_cell_count(&self) -> usize {
        self.cells.len()
    }

    /// 结果条目使用的行号
    pub fn row_index(&self) -> i64 {
        i64::from(self.row_number)
    }
}

// ==========================================
// Workbook Trait
// ==========================================
// 用途: 导入阶段读取工作表的统一接口
// 实现者: ExcelWorkbook, MemoryWorkbook
pub trait Workbook {
    fn sheet_names(&self) -> Vec<String>;

    /// 按名称读取整张工作表
    ///
    /// # 返回
    /// - Ok(Some(rows)): 工作表存在
    /// - Ok(None): 工作表不存在
    /// - Err: 工作表存在但读取失败
    fn read_sheet(&mut self, name: &str) -> ImportResult<Option<Vec<SheetRow>>>;

    fn has_sheet(&self, name: &str) -> bool {
        self.sheet_names().iter().any(|n| n == name)
    }
}

// ==========================================
// ExcelWorkbook - calamine 实现
// ==========================================
pub struct ExcelWorkbook {
    sheets: Sheets<BufReader<File>>,
}

impl ExcelWorkbook {
    /// 打开工作簿（按扩展名自动识别格式）
    pub fn open<P: AsRef<Path>>(path: P) -> ImportResult<Self> {
        let path = path.as_ref();

        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let sheets = open_workbook_auto(path)?;
        debug!(file = %path.display(), sheets = ?sheets.sheet_names(), "工作簿已打开");

        Ok(Self { sheets })
    }
}

impl Workbook for ExcelWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.sheet_names()
    }

    fn read_sheet(&mut self, name: &str) -> ImportResult<Option<Vec<SheetRow>>> {
        if !self.has_sheet(name) {
            return Ok(None);
        }

        let range = self
            .sheets
            .worksheet_range(name)
            .map_err(|e| ImportError::SheetReadError {
                sheet: name.to_string(),
                message: e.to_string(),
            })?;

        Ok(Some(rows_from_range(&range)))
    }
}

/// 将 calamine 区域转换为带绝对行号的行
///
/// calamine 的区域从首个非空单元格开始，这里补齐左侧空列，
/// 保证列下标与工作表列一致。
fn rows_from_range(range: &Range<Data>) -> Vec<SheetRow> {
    let (start_row, start_col) = match range.start() {
        Some(start) => start,
        None => return Vec::new(),
    };

    range
        .rows()
        .enumerate()
        .map(|(offset, data)| {
            let mut cells = vec![SheetCell::Empty; start_col as usize];
            cells.extend(data.iter().map(SheetCell::from_data));
            SheetRow::new(start_row + offset as u32 + 1, cells)
        })
        .collect()
}

// ==========================================
// MemoryWorkbook - 内存实现
// ==========================================
/// 已在内存中的工作表集合（行号按 1 起始顺序编号）
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkbook {
    order: Vec<String>,
    sheets: HashMap<String, Vec<SheetRow>>,
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet<S: AsRef<str>>(mut self, name: &str, rows: &[Vec<S>]) -> Self {
        let rows = rows
            .iter()
            .enumerate()
            .map(|(idx, texts)| SheetRow::from_texts(idx as u32 + 1, texts))
            .collect();
        self.insert_rows(name, rows);
        self
    }

    pub fn insert_rows(&mut self, name: &str, rows: Vec<SheetRow>) {
        if !self.sheets.contains_key(name) {
            self.order.push(name.to_string());
        }
        self.sheets.insert(name.to_string(), rows);
    }
}

impl Workbook for MemoryWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.order.clone()
    }

    fn read_sheet(&mut self, name: &str) -> ImportResult<Option<Vec<SheetRow>>> {
        Ok(self.sheets.get(name).cloned())
    }
}
