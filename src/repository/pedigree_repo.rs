// ==========================================
// 谱系导入器 - 谱系 Repository Trait
// ==========================================
// 职责: 定义谱系导入所需的数据访问接口（不包含实现）
// 红线: Repository 不含业务规则，只做批量读取与单行写入
// ==========================================

use crate::domain::pedigree::{
    NewPedigree, NewPedigreeDefinition, NewPedigreeDescription, NewPedigreeNotation,
};
use crate::repository::error::RepositoryResult;
use std::collections::HashMap;

// ==========================================
// PedigreeStore Trait
// ==========================================
// 用途: 按阶段获取独立的作用域连接
// 实现者: SqlitePedigreeStore
pub trait PedigreeStore {
    type Repo: PedigreeRepository;

    /// 打开一个新连接，调用方在作用域结束时释放
    fn connect(&self) -> RepositoryResult<Self::Repo>;
}

// ==========================================
// PedigreeRepository Trait
// ==========================================
// 用途: 单个连接上的参考数据读取与记录插入
// 实现者: SqlitePedigreeRepository
pub trait PedigreeRepository {
    // ===== 参考数据批量读取 =====

    /// 种质名称 → id
    fn load_germplasm_index(&self) -> RepositoryResult<HashMap<String, i64>>;

    /// "描述|作者" → 谱系描述 id
    ///
    /// 作者为空时按空串拼接
    fn load_description_index(&self) -> RepositoryResult<HashMap<String, i64>>;

    /// 命名法名称 → id
    fn load_notation_index(&self) -> RepositoryResult<HashMap<String, i64>>;

    // ===== 单行写入（返回生成的 id）=====

    fn insert_description(&self, description: &NewPedigreeDescription) -> RepositoryResult<i64>;

    fn insert_notation(&self, notation: &NewPedigreeNotation) -> RepositoryResult<i64>;

    fn insert_pedigree(&self, pedigree: &NewPedigree) -> RepositoryResult<i64>;

    fn insert_definition(&self, definition: &NewPedigreeDefinition) -> RepositoryResult<i64>;
}
