// ==========================================
// 谱系数据导入器 - 核心库
// ==========================================
// 技术栈: Rust + SQLite + calamine
// 系统定位: 批量导入工具（单次运行，顺序执行）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与结果类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - 表格校验与落库
pub mod importer;

// 配置层 - 运行配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

pub use config::{ImportRunConfig, RunMode};
pub use domain::{ImportResultEntry, ImportStatus};
pub use importer::{ImportRunner, PedigreeImporter, RunReport, SheetImporter};
pub use repository::SqlitePedigreeStore;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "谱系数据导入器";
