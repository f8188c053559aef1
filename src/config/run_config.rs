// ==========================================
// 谱系导入器 - 单次导入运行配置
// ==========================================
// 职责: 描述一次导入运行（文件、模式、开关、用户、数据库）
// 生命周期: 每次进程调用构造一次，不落库
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

// ==========================================
// 运行模式 (Run Mode)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunMode {
    #[default]
    Check,
    Import,
    CheckAndImport,
}

impl RunMode {
    /// 解析命令行模式标记；无法识别时回退为 CHECK
    pub fn from_token(token: &str) -> Self {
        match token {
            "CHECK" => RunMode::Check,
            "IMPORT" => RunMode::Import,
            "CHECK_AND_IMPORT" => RunMode::CheckAndImport,
            _ => RunMode::Check,
        }
    }

    pub fn includes_check(self) -> bool {
        matches!(self, RunMode::Check | RunMode::CheckAndImport)
    }

    pub fn includes_import(self) -> bool {
        matches!(self, RunMode::Import | RunMode::CheckAndImport)
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Check => write!(f, "CHECK"),
            RunMode::Import => write!(f, "IMPORT"),
            RunMode::CheckAndImport => write!(f, "CHECK_AND_IMPORT"),
        }
    }
}

/// 解析布尔开关：仅 "true"（忽略大小写）为真，其余一律为假
pub fn parse_flag(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case("true")
}

// ==========================================
// ImportRunConfig - 导入运行配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportRunConfig {
    /// 数据库文件路径
    pub db_path: PathBuf,
    /// 待导入的表格文件
    pub input: PathBuf,
    pub run_mode: RunMode,
    /// 更新模式（当前与新建走同一路径）
    pub is_update: bool,
    /// 校验失败时删除源文件
    pub delete_on_fail: bool,
    /// 发起导入的用户 id
    pub user_id: i64,
}

impl ImportRunConfig {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(db_path: P, input: Q, run_mode: RunMode) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
            input: input.as_ref().to_path_buf(),
            run_mode,
            is_update: false,
            delete_on_fail: false,
            user_id: 0,
        }
    }

    pub fn with_update(mut self, is_update: bool) -> Self {
        self.is_update = is_update;
        self
    }

    pub fn with_delete_on_fail(mut self, delete_on_fail: bool) -> Self {
        self.delete_on_fail = delete_on_fail;
        self
    }

    pub fn with_user_id(mut self, user_id: i64) -> Self {
        self.user_id = user_id;
        self
    }

    /// 结果文件路径：与输入文件同目录、同名，扩展名替换为 .json
    pub fn result_path(&self) -> PathBuf {
        self.input.with_extension("json")
    }
}
