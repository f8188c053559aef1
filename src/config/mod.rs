// ==========================================
// 谱系导入器 - 配置层
// ==========================================
// 职责: 单次导入运行的配置（来自命令行参数）
// ==========================================

pub mod run_config;

pub use run_config::{parse_flag, ImportRunConfig, RunMode};
