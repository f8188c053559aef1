// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 临时数据库初始化、种质种子数据、xlsx 测试文件生成
// ==========================================

#![allow(dead_code)]

use pedigree_importer::db::{init_schema, open_sqlite_connection};
use pedigree_importer::importer::pedigree_importer::{
    FIELD_ACCENUMB, FIELD_ACCENUMB_PARENT_1, FIELD_ACCENUMB_PARENT_2, FIELD_AUTHOR,
    FIELD_DESCRIPTION, FIELD_DESCRIPTION_PROCEDURE, FIELD_NOTATION, FIELD_STRING,
};
use rust_xlsxwriter::Workbook;
use std::error::Error;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// 种子种质名称
pub const SEED_GERMPLASM: [&str; 5] = ["ACC-1", "ACC-2", "ACC-3", "ACC-4", "ACC-5"];

pub const DATA_HEADER: [&str; 6] = [
    FIELD_ACCENUMB,
    FIELD_ACCENUMB_PARENT_1,
    FIELD_ACCENUMB_PARENT_2,
    FIELD_DESCRIPTION_PROCEDURE,
    FIELD_DESCRIPTION,
    FIELD_AUTHOR,
];

pub const DATA_STRING_HEADER: [&str; 3] = [FIELD_ACCENUMB, FIELD_STRING, FIELD_NOTATION];

/// 创建临时测试数据库并初始化 schema + 种质
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - PathBuf: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, PathBuf), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_path_buf();

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;
    for name in SEED_GERMPLASM {
        conn.execute("INSERT INTO germinatebase (name) VALUES (?1)", [name])?;
    }

    Ok((temp_file, db_path))
}

/// 统计表行数
pub fn count_rows(db_path: &Path, table: &str) -> i64 {
    let conn = open_sqlite_connection(db_path).unwrap();
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))
        .unwrap()
}

/// 按工作表写出 xlsx 测试文件；空字符串单元格不写入
pub fn write_workbook(
    path: &Path,
    sheets: &[(&str, Vec<Vec<&str>>)],
) -> Result<(), Box<dyn Error>> {
    let mut workbook = Workbook::new();
    for (name, rows) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name)?;
        for (r, row) in rows.iter().enumerate() {
            for (c, text) in row.iter().enumerate() {
                if !text.is_empty() {
                    worksheet.write_string(r as u32, c as u16, *text)?;
                }
            }
        }
    }
    workbook.save(path)?;
    Ok(())
}

/// 带表头的 DATA 工作表
pub fn data_sheet<'a>(rows: &[[&'a str; 6]]) -> (&'static str, Vec<Vec<&'a str>>) {
    let mut all = vec![DATA_HEADER.to_vec()];
    all.extend(rows.iter().map(|r| r.to_vec()));
    ("DATA", all)
}

/// 带表头的 DATA-STRING 工作表
pub fn data_string_sheet<'a>(rows: &[[&'a str; 3]]) -> (&'static str, Vec<Vec<&'a str>>) {
    let mut all = vec![DATA_STRING_HEADER.to_vec()];
    all.extend(rows.iter().map(|r| r.to_vec()));
    ("DATA-STRING", all)
}
