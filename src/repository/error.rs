// ==========================================
// 谱系导入器 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 数据库错误 =====
    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("数据库查询失败: {0}")]
    DatabaseQueryError(String),

    #[error("唯一约束违反: {0}")]
    UniqueConstraintViolation(String),

    #[error("外键约束违反: {0}")]
    ForeignKeyViolation(String),

    #[error("非空约束违反: {0}")]
    NotNullViolation(String),
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(code, _) = &err {
            if code.code == rusqlite::ErrorCode::CannotOpen {
                return RepositoryError::DatabaseConnectionError(err.to_string());
            }
        }

        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => {
                if msg.contains("UNIQUE") {
                    RepositoryError::UniqueConstraintViolation(msg)
                } else if msg.contains("FOREIGN KEY") {
                    RepositoryError::ForeignKeyViolation(msg)
                } else if msg.contains("NOT NULL") {
                    RepositoryError::NotNullViolation(msg)
                } else {
                    RepositoryError::DatabaseQueryError(msg)
                }
            }
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{configure_sqlite_connection, init_schema};
    use rusqlite::Connection;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        init_schema(&conn).unwrap();
        conn
    }

    #[test]
    fn test_unique_violation_mapping() {
        let conn = setup();
        conn.execute("INSERT INTO germinatebase (name) VALUES ('ACC-1')", []).unwrap();
        let err = conn
            .execute("INSERT INTO germinatebase (name) VALUES ('ACC-1')", [])
            .unwrap_err();
        assert!(matches!(
            RepositoryError::from(err),
            RepositoryError::UniqueConstraintViolation(_)
        ));
    }

    #[test]
    fn test_not_null_violation_mapping() {
        let conn = setup();
        let err = conn
            .execute("INSERT INTO pedigreenotations (name) VALUES (NULL)", [])
            .unwrap_err();
        assert!(matches!(RepositoryError::from(err), RepositoryError::NotNullViolation(_)));
    }

    #[test]
    fn test_missing_table_is_query_error() {
        let conn = Connection::open_in_memory().unwrap();
        let err = conn
            .prepare("SELECT name, id FROM germinatebase")
            .map(|_| ())
            .unwrap_err();
        assert!(matches!(RepositoryError::from(err), RepositoryError::DatabaseQueryError(_)));
    }
}
