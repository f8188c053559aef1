// ==========================================
// 谱系导入器 - 谱系领域实体
// ==========================================
// 职责: 定义写入存储的谱系描述/命名法/谱系关系/谱系定义
// 约束: 只新建，不就地更新
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 谱系关系类型 (Relationship Type)
// ==========================================
// 序列化格式: snake_case (与数据库一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    MaleParent,
    FemaleParent,
    Other,
}

impl RelationshipType {
    /// 转换为数据库存储字符串
    pub fn to_db_str(self) -> &'static str {
        match self {
            RelationshipType::MaleParent => "male_parent",
            RelationshipType::FemaleParent => "female_parent",
            RelationshipType::Other => "other",
        }
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 谱系描述 (pedigreedescriptions)
// ==========================================
// 自然键: 描述文本 + 作者
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPedigreeDescription {
    pub name: String,
    pub description: Option<String>,
    pub author: Option<String>,
    pub created_on: DateTime<Utc>,
}

impl NewPedigreeDescription {
    /// 以描述文本同时作为名称与描述
    pub fn new(description: Option<&str>, author: Option<&str>) -> Self {
        Self {
            name: description.unwrap_or_default().to_string(),
            description: description.map(str::to_string),
            author: author.map(str::to_string),
            created_on: Utc::now(),
        }
    }
}

// ==========================================
// 谱系命名法 (pedigreenotations)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPedigreeNotation {
    pub name: String,
    pub description: Option<String>,
    pub created_on: DateTime<Utc>,
}

impl NewPedigreeNotation {
    pub fn new(name: Option<&str>) -> Self {
        Self {
            name: name.unwrap_or_default().to_string(),
            description: name.map(str::to_string),
            created_on: Utc::now(),
        }
    }
}

// ==========================================
// 谱系关系 (pedigrees)
// ==========================================
// 子代种质 → 亲本种质
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPedigree {
    pub germinatebase_id: i64,
    pub parent_id: i64,
    pub relationship_type: RelationshipType,
    pub relationship_description: Option<String>,
    pub pedigreedescription_id: i64,
    pub created_on: DateTime<Utc>,
}

// ==========================================
// 谱系定义 (pedigreedefinitions)
// ==========================================
// 种质 → 命名法，附带谱系字符串
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPedigreeDefinition {
    pub germinatebase_id: i64,
    pub pedigreenotation_id: i64,
    pub definition: Option<String>,
    pub created_on: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relationship_type_db_values() {
        // 与 pedigrees.relationship_type 的 CHECK 约束一致
        assert_eq!(RelationshipType::MaleParent.to_db_str(), "male_parent");
        assert_eq!(RelationshipType::FemaleParent.to_db_str(), "female_parent");
        assert_eq!(RelationshipType::Other.to_db_str(), "other");
        assert_eq!(RelationshipType::Other.to_string(), "other");
    }

    #[test]
    fn test_new_description_uses_text_as_name() {
        let d = NewPedigreeDescription::new(Some("F1 cross"), Some("Smith"));
        assert_eq!(d.name, "F1 cross");
        assert_eq!(d.description.as_deref(), Some("F1 cross"));
        assert_eq!(d.author.as_deref(), Some("Smith"));

        let empty = NewPedigreeDescription::new(None, None);
        assert_eq!(empty.name, "");
        assert!(empty.description.is_none());
    }
}
