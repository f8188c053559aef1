// 初始化谱系数据库: 备份旧库 → 建表 → 写入种质名录
//
// 用法: init_pedigree_db <DB_PATH> [GERMPLASM_LIST]
//   GERMPLASM_LIST: 文本文件，每行一个种质名称（空行与 # 开头的行忽略）

use chrono::{Local, Utc};
use rusqlite::{params, Connection};
use std::error::Error;
use std::fs;
use std::path::Path;

use pedigree_importer::db::{init_schema, open_sqlite_connection};

const DEFAULT_DB_PATH: &str = "pedigree.db";

fn main() -> Result<(), Box<dyn Error>> {
    let db_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_DB_PATH.to_string());
    let germplasm_list = std::env::args().nth(2);

    backup_and_reset_db(&db_path)?;

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;

    if let Some(list_path) = germplasm_list {
        let names = read_germplasm_names(Path::new(&list_path))?;
        seed_germplasm(&conn, &names)?;
    }

    print_quick_counts(&conn)?;
    Ok(())
}

fn backup_and_reset_db(db_path: &str) -> Result<(), Box<dyn Error>> {
    let path = Path::new(db_path);
    if !path.exists() {
        return Ok(());
    }

    let ts = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let backup_path = format!("{}.bak.{}", db_path, ts);
    fs::copy(path, &backup_path)?;
    fs::remove_file(path)?;

    eprintln!("Backed up {} -> {}", db_path, backup_path);
    Ok(())
}

fn read_germplasm_names(path: &Path) -> Result<Vec<String>, Box<dyn Error>> {
    let content = fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

fn seed_germplasm(conn: &Connection, names: &[String]) -> Result<(), Box<dyn Error>> {
    let now = Utc::now();
    let mut stmt =
        conn.prepare("INSERT OR IGNORE INTO germinatebase (name, created_on) VALUES (?1, ?2)")?;
    for name in names {
        stmt.execute(params![name, now])?;
    }
    eprintln!("Seeded {} germplasm names", names.len());
    Ok(())
}

fn print_quick_counts(conn: &Connection) -> Result<(), Box<dyn Error>> {
    let tables = [
        "germinatebase",
        "pedigreedescriptions",
        "pedigreenotations",
        "pedigrees",
        "pedigreedefinitions",
    ];

    eprintln!("Row counts:");
    for t in tables {
        let sql = format!("SELECT COUNT(*) FROM {}", t);
        let c: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
        eprintln!("  {:<22} {}", t, c);
    }
    Ok(())
}
