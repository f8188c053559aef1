// ==========================================
// 谱系导入器 - 领域层
// ==========================================
// 职责: 领域实体与结果类型，不含存储与解析逻辑
// ==========================================

pub mod import_status;
pub mod pedigree;

// 重导出核心类型
pub use import_status::{ImportResultEntry, ImportStatus, FILE_LEVEL_ROW};
pub use pedigree::{
    NewPedigree, NewPedigreeDefinition, NewPedigreeDescription, NewPedigreeNotation,
    RelationshipType,
};
