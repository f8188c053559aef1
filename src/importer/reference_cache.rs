// ==========================================
// 谱系导入器 - 参考数据缓存
// ==========================================
// 职责: 单次运行内的 自然键 → id 映射
// 生命周期: prepare 阶段批量加载；导入阶段新建记录后就地追加
//           （同一运行内后续行直接复用，不再查库）
// 归属: 仅属于一次运行，不跨运行共享
// ==========================================

use crate::repository::{PedigreeRepository, RepositoryResult};
use std::collections::HashMap;
use tracing::info;

/// 谱系描述复合键的分隔符
pub const DESCRIPTION_KEY_SEPARATOR: char = '|';

/// 谱系描述复合键：描述 + '|' + 作者（缺失部分按空串）
pub fn description_key(description: Option<&str>, author: Option<&str>) -> String {
    format!(
        "{}{}{}",
        description.unwrap_or_default(),
        DESCRIPTION_KEY_SEPARATOR,
        author.unwrap_or_default()
    )
}

// ==========================================
// ReferenceIndex - 自然键索引
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
    entries: HashMap<String, i64>,
}

impl ReferenceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(entries: HashMap<String, i64>) -> Self {
        Self { entries }
    }

    /// 空键永远不命中
    pub fn get(&self, key: Option<&str>) -> Option<i64> {
        key.and_then(|k| self.entries.get(k).copied())
    }

    pub fn contains(&self, key: Option<&str>) -> bool {
        self.get(key).is_some()
    }

    pub fn insert(&mut self, key: String, id: i64) {
        self.entries.insert(key, id);
    }

    /// 命中则返回已有 id；否则调用 create 新建并立即登记
    ///
    /// 同一运行内相同键只会触发一次 create。
    pub fn get_or_insert_with<E, F>(&mut self, key: String, create: F) -> Result<i64, E>
    where
        F: FnOnce() -> Result<i64, E>,
    {
        if let Some(&id) = self.entries.get(&key) {
            return Ok(id);
        }
        let id = create()?;
        self.entries.insert(key, id);
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ==========================================
// PedigreeReferenceCache - 谱系导入所需的全部索引
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct PedigreeReferenceCache {
    /// 种质名称 → id
    pub germplasm: ReferenceIndex,
    /// "描述|作者" → 谱系描述 id
    pub descriptions: ReferenceIndex,
    /// 命名法名称 → id
    pub notations: ReferenceIndex,
}

impl PedigreeReferenceCache {
    /// 通过一个连接批量加载全部索引
    pub fn load<R: PedigreeRepository>(repo: &R) -> RepositoryResult<Self> {
        let cache = Self {
            germplasm: ReferenceIndex::from_map(repo.load_germplasm_index()?),
            descriptions: ReferenceIndex::from_map(repo.load_description_index()?),
            notations: ReferenceIndex::from_map(repo.load_notation_index()?),
        };

        info!(
            germplasm = cache.germplasm.len(),
            descriptions = cache.descriptions.len(),
            notations = cache.notations.len(),
            "参考数据加载完成"
        );

        Ok(cache)
    }
}
