// ==========================================
// 谱系导入器 - 导入层
// ==========================================
// 职责: 读取谱系表格，校验后写入谱系关系
// 流程: 准备(参考数据) → 校验 → 决策门 → 导入/更新 → 结果文件
// ==========================================

// 模块声明
pub mod cell_reader;
pub mod error;
pub mod pedigree_importer;
pub mod reference_cache;
pub mod result_collector;
pub mod runner;
pub mod sheet_importer_trait;
pub mod sheet_template;
pub mod workbook;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use pedigree_importer::PedigreeImporter;
pub use reference_cache::{PedigreeReferenceCache, ReferenceIndex};
pub use result_collector::ImportResultCollector;
pub use runner::{ImportRunner, RunReport, RunState};
pub use sheet_template::SheetTemplate;
pub use workbook::{ExcelWorkbook, MemoryWorkbook, SheetCell, SheetRow, Workbook};

// 重导出 Trait 接口
pub use sheet_importer_trait::SheetImporter;
