// ==========================================
// 谱系导入器 - 表格导入器 Trait
// ==========================================
// 职责: 定义各类表格导入器共享的阶段接口（不包含实现）
// 流程: prepare → check_file → import_file / update_file
// 编排: 由 ImportRunner 按运行模式调度
// ==========================================

use crate::importer::error::ImportResult;
use crate::importer::result_collector::ImportResultCollector;
use crate::importer::workbook::Workbook;

// ==========================================
// SheetImporter Trait
// ==========================================
// 用途: 单类表格的准备/校验/导入阶段
// 实现者: PedigreeImporter
pub trait SheetImporter {
    /// 导入器名称（日志用）
    fn name(&self) -> &'static str;

    /// 准备阶段：加载参考数据
    ///
    /// # 返回
    /// - Err: 连接或查询失败（由编排器记录为 GENERIC_IO_ERROR）
    fn prepare(&mut self) -> ImportResult<()>;

    /// 校验阶段：结构检查 + 逐行检查
    ///
    /// 行级/结构级问题写入 results，不中断扫描。
    fn check_file(
        &mut self,
        workbook: &mut dyn Workbook,
        results: &mut ImportResultCollector,
    ) -> ImportResult<()>;

    /// 导入阶段：新建记录
    fn import_file(
        &mut self,
        workbook: &mut dyn Workbook,
        results: &mut ImportResultCollector,
    ) -> ImportResult<()>;

    /// 更新阶段
    ///
    /// 默认与导入阶段完全相同：只新增记录，不比对、不覆盖已有记录。
    fn update_file(
        &mut self,
        workbook: &mut dyn Workbook,
        results: &mut ImportResultCollector,
    ) -> ImportResult<()> {
        self.import_file(workbook, results)
    }
}
