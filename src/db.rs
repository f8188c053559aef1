// ==========================================
// 谱系导入器 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少外部进程同时写库时的 busy 错误
// - 提供谱系相关表的建表语句（新库/测试库使用）
// ==========================================

use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 谱系导入涉及的表结构
///
/// 说明：
/// - germinatebase 为只读参考表（种质），导入器从不写入
/// - 其余四张表由导入阶段写入，id 由 SQLite 自增生成
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS germinatebase (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL UNIQUE,
    created_on  TEXT
);

CREATE TABLE IF NOT EXISTS pedigreedescriptions (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    description TEXT,
    author      TEXT,
    created_on  TEXT
);

CREATE TABLE IF NOT EXISTS pedigreenotations (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    description TEXT,
    created_on  TEXT
);

CREATE TABLE IF NOT EXISTS pedigrees (
    id                       INTEGER PRIMARY KEY AUTOINCREMENT,
    germinatebase_id         INTEGER NOT NULL REFERENCES germinatebase(id),
    parent_id                INTEGER NOT NULL REFERENCES germinatebase(id),
    relationship_type        TEXT NOT NULL DEFAULT 'other'
                             CHECK (relationship_type IN ('male_parent', 'female_parent', 'other')),
    relationship_description TEXT,
    pedigreedescription_id   INTEGER REFERENCES pedigreedescriptions(id),
    created_on               TEXT
);

CREATE TABLE IF NOT EXISTS pedigreedefinitions (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    germinatebase_id    INTEGER NOT NULL REFERENCES germinatebase(id),
    pedigreenotation_id INTEGER NOT NULL REFERENCES pedigreenotations(id),
    definition          TEXT,
    created_on          TEXT
);
"#;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection<P: AsRef<Path>>(db_path: P) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 打开已存在的 SQLite 库并应用统一配置
///
/// 不带 CREATE 标志：路径不存在时返回 CannotOpen，而不是静默新建空库。
/// 导入运行只使用此函数；建库工具使用 open_sqlite_connection。
pub fn open_existing_sqlite_connection<P: AsRef<Path>>(db_path: P) -> rusqlite::Result<Connection> {
    let conn = Connection::open_with_flags(
        db_path,
        OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 建表（幂等）
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)
}
