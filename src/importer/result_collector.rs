// ==========================================
// 谱系导入器 - 导入结果收集器
// ==========================================
// 规则: 每种状态只保留第一次出现的条目（插入即不可覆盖）
// 说明: 状态种类是去重键，不是计数器；后续同类问题静默丢弃
// ==========================================

use crate::domain::import_status::{ImportResultEntry, ImportStatus};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct ImportResultCollector {
    entries: BTreeMap<ImportStatus, ImportResultEntry>,
}

impl ImportResultCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一个问题；该种类已存在时忽略
    ///
    /// # 返回
    /// - true: 新记录
    /// - false: 同类已存在，被丢弃
    pub fn record<M: Into<Option<String>>>(
        &mut self,
        status: ImportStatus,
        row_index: i64,
        message: M,
    ) -> bool {
        if self.entries.contains_key(&status) {
            return false;
        }

        let entry = ImportResultEntry::new(status, row_index, message.into());
        debug!(status = %status, row_index, message = ?entry.message, "记录导入问题");
        self.entries.insert(status, entry);
        true
    }

    pub fn has_errors(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn contains(&self, status: ImportStatus) -> bool {
        self.entries.contains_key(&status)
    }

    pub fn get(&self, status: ImportStatus) -> Option<&ImportResultEntry> {
        self.entries.get(&status)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 当前全部条目（按状态种类排序）
    pub fn results(&self) -> Vec<ImportResultEntry> {
        self.entries.values().cloned().collect()
    }

    pub fn into_results(self) -> Vec<ImportResultEntry> {
        self.entries.into_values().collect()
    }
}
