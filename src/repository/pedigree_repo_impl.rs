// ==========================================
// 谱系导入器 - 谱系 Repository 实现
// ==========================================
// 职责: 使用 rusqlite 实现谱系数据访问
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::db::open_existing_sqlite_connection;
use crate::domain::pedigree::{
    NewPedigree, NewPedigreeDefinition, NewPedigreeDescription, NewPedigreeNotation,
};
use crate::repository::error::RepositoryResult;
use crate::repository::pedigree_repo::{PedigreeRepository, PedigreeStore};
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

// ==========================================
// SqlitePedigreeStore
// ==========================================
/// 按数据库路径开连接；每次 connect 都是新的独立连接，库文件必须已存在
#[derive(Debug, Clone)]
pub struct SqlitePedigreeStore {
    db_path: PathBuf,
}

impl SqlitePedigreeStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

impl PedigreeStore for SqlitePedigreeStore {
    type Repo = SqlitePedigreeRepository;

    fn connect(&self) -> RepositoryResult<Self::Repo> {
        debug!(db_path = %self.db_path.display(), "打开数据库连接");
        let conn = open_existing_sqlite_connection(&self.db_path)?;
        Ok(SqlitePedigreeRepository::from_connection(conn))
    }
}

// ==========================================
// SqlitePedigreeRepository
// ==========================================
pub struct SqlitePedigreeRepository {
    conn: Connection,
}

impl SqlitePedigreeRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// 执行 "key, id" 两列查询并收集为映射
    fn fetch_map(&self, sql: &str) -> RepositoryResult<HashMap<String, i64>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?;
        let map = rows.collect::<rusqlite::Result<HashMap<String, i64>>>()?;
        Ok(map)
    }
}

impl PedigreeRepository for SqlitePedigreeRepository {
    fn load_germplasm_index(&self) -> RepositoryResult<HashMap<String, i64>> {
        self.fetch_map("SELECT name, id FROM germinatebase")
    }

    fn load_description_index(&self) -> RepositoryResult<HashMap<String, i64>> {
        self.fetch_map(
            "SELECT name || '|' || COALESCE(author, ''), id FROM pedigreedescriptions",
        )
    }

    fn load_notation_index(&self) -> RepositoryResult<HashMap<String, i64>> {
        self.fetch_map("SELECT name, id FROM pedigreenotations")
    }

    fn insert_description(&self, description: &NewPedigreeDescription) -> RepositoryResult<i64> {
        self.conn.execute(
            r#"
            INSERT INTO pedigreedescriptions (name, description, author, created_on)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                description.name,
                description.description,
                description.author,
                description.created_on,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn insert_notation(&self, notation: &NewPedigreeNotation) -> RepositoryResult<i64> {
        self.conn.execute(
            r#"
            INSERT INTO pedigreenotations (name, description, created_on)
            VALUES (?1, ?2, ?3)
            "#,
            params![notation.name, notation.description, notation.created_on],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn insert_pedigree(&self, pedigree: &NewPedigree) -> RepositoryResult<i64> {
        self.conn.execute(
            r#"
            INSERT INTO pedigrees (
                germinatebase_id, parent_id, relationship_type,
                relationship_description, pedigreedescription_id, created_on
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                pedigree.germinatebase_id,
                pedigree.parent_id,
                pedigree.relationship_type.to_db_str(),
                pedigree.relationship_description,
                pedigree.pedigreedescription_id,
                pedigree.created_on,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn insert_definition(&self, definition: &NewPedigreeDefinition) -> RepositoryResult<i64> {
        self.conn.execute(
            r#"
            INSERT INTO pedigreedefinitions (
                germinatebase_id, pedigreenotation_id, definition, created_on
            ) VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                definition.germinatebase_id,
                definition.pedigreenotation_id,
                definition.definition,
                definition.created_on,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{configure_sqlite_connection, init_schema};
    use crate::domain::pedigree::RelationshipType;
    use crate::repository::error::RepositoryError;
    use chrono::Utc;

    fn setup_repo() -> SqlitePedigreeRepository {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        init_schema(&conn).unwrap();
        conn.execute_batch(
            "INSERT INTO germinatebase (name) VALUES ('ACC-1'), ('ACC-2'), ('ACC-3');",
        )
        .unwrap();
        SqlitePedigreeRepository::from_connection(conn)
    }

    #[test]
    fn test_load_germplasm_index() {
        let repo = setup_repo();
        let index = repo.load_germplasm_index().unwrap();
        assert_eq!(index.len(), 3);
        assert_eq!(index.get("ACC-1"), Some(&1));
        assert_eq!(index.get("ACC-3"), Some(&3));
    }

    #[test]
    fn test_description_index_uses_composite_key() {
        let repo = setup_repo();
        let with_author = repo
            .insert_description(&NewPedigreeDescription::new(Some("Backcross"), Some("Lee")))
            .unwrap();
        let without_author = repo
            .insert_description(&NewPedigreeDescription::new(Some("Selfing"), None))
            .unwrap();

        let index = repo.load_description_index().unwrap();
        assert_eq!(index.get("Backcross|Lee"), Some(&with_author));
        assert_eq!(index.get("Selfing|"), Some(&without_author));
    }

    #[test]
    fn test_insert_pedigree_and_definition() {
        let repo = setup_repo();
        let description_id = repo
            .insert_description(&NewPedigreeDescription::new(Some("Cross"), Some("Ann")))
            .unwrap();
        let pedigree_id = repo
            .insert_pedigree(&NewPedigree {
                germinatebase_id: 1,
                parent_id: 2,
                relationship_type: RelationshipType::Other,
                relationship_description: Some("hand pollination".to_string()),
                pedigreedescription_id: description_id,
                created_on: Utc::now(),
            })
            .unwrap();
        assert!(pedigree_id > 0);

        let notation_id = repo
            .insert_notation(&NewPedigreeNotation::new(Some("Purdy")))
            .unwrap();
        let definition_id = repo
            .insert_definition(&NewPedigreeDefinition {
                germinatebase_id: 1,
                pedigreenotation_id: notation_id,
                definition: Some("ACC-2/ACC-3".to_string()),
                created_on: Utc::now(),
            })
            .unwrap();
        assert!(definition_id > 0);

        let relationship_type: String = repo
            .conn
            .query_row("SELECT relationship_type FROM pedigrees", [], |row| row.get(0))
            .unwrap();
        assert_eq!(relationship_type, "other");

        let notations = repo.load_notation_index().unwrap();
        assert_eq!(notations.get("Purdy"), Some(&notation_id));
    }

    #[test]
    fn test_insert_pedigree_unknown_parent_is_foreign_key_error() {
        let repo = setup_repo();
        let err = repo
            .insert_pedigree(&NewPedigree {
                germinatebase_id: 1,
                parent_id: 999,
                relationship_type: RelationshipType::Other,
                relationship_description: None,
                pedigreedescription_id: 1,
                created_on: Utc::now(),
            })
            .unwrap_err();
        assert!(matches!(err, RepositoryError::ForeignKeyViolation(_)));
    }

    #[test]
    fn test_store_connect_requires_existing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let db_path = dir.path().join("typo.db");
        let store = SqlitePedigreeStore::new(&db_path);

        let err = store.connect().err().unwrap();
        assert!(matches!(err, RepositoryError::DatabaseConnectionError(_)));
        assert!(!db_path.exists());
    }
}
