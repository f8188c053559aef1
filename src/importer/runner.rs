// ==========================================
// 谱系导入器 - 运行编排器
// ==========================================
// 状态: INIT → PREPARED → (CHECKED)? → (IMPORTED)? → DONE
// 规则:
// - 单次顺序执行，无重试，无回退
// - 决策门: 无问题且模式含导入 → 导入/更新；有问题且配置了失败删除 → 删除源文件
// - 任何阶段的 Err 折叠为一条 GENERIC_IO_ERROR
// - DONE 阶段总是写出结果文件（即使结果为空）
// ==========================================

use crate::config::ImportRunConfig;
use crate::domain::import_status::{ImportResultEntry, ImportStatus, FILE_LEVEL_ROW};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::result_collector::ImportResultCollector;
use crate::importer::sheet_importer_trait::SheetImporter;
use crate::importer::workbook::{ExcelWorkbook, Workbook};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info, instrument, warn};

/// 运行状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunState {
    Init,
    Prepared,
    Checked,
    Imported,
    Done,
}

/// 一次运行的汇总
#[derive(Debug, Clone)]
pub struct RunReport {
    /// 写入结果文件的全部条目
    pub results: Vec<ImportResultEntry>,
    /// 实际经过的状态序列
    pub state_trail: Vec<RunState>,
    /// 是否已删除源文件
    pub input_deleted: bool,
    pub result_file: PathBuf,
}

impl RunReport {
    pub fn has_errors(&self) -> bool {
        !self.results.is_empty()
    }

    pub fn reached(&self, state: RunState) -> bool {
        self.state_trail.contains(&state)
    }
}

// ==========================================
// ImportRunner
// ==========================================
pub struct ImportRunner<I: SheetImporter> {
    importer: I,
    config: ImportRunConfig,
}

impl<I: SheetImporter> ImportRunner<I> {
    pub fn new(importer: I, config: ImportRunConfig) -> Self {
        Self { importer, config }
    }

    pub fn config(&self) -> &ImportRunConfig {
        &self.config
    }

    pub fn importer(&self) -> &I {
        &self.importer
    }

    /// 执行一次完整运行
    ///
    /// # 返回
    /// - Ok(RunReport): 结果文件已写出（问题列表可能非空）
    /// - Err: 仅当结果文件无法写出
    #[instrument(skip(self), fields(
        importer = self.importer.name(),
        input = %self.config.input.display(),
        mode = %self.config.run_mode,
    ))]
    pub fn run(&mut self) -> ImportResult<RunReport> {
        let start = Instant::now();
        let mut results = ImportResultCollector::new();
        let mut trail = vec![RunState::Init];

        let delete_input = match ExcelWorkbook::open(&self.config.input) {
            Ok(mut workbook) => self.execute_phases(&mut workbook, &mut results, &mut trail),
            Err(e) => {
                error!(error = %e, "打开输入文件失败");
                results.record(ImportStatus::GenericIoError, FILE_LEVEL_ROW, e.to_string());
                false
            }
        };
        // 工作簿句柄在此之前已释放，删除不会被占用

        let report = self.finish(results, trail, delete_input)?;
        info!(
            issues = report.results.len(),
            input_deleted = report.input_deleted,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "导入运行结束"
        );
        Ok(report)
    }

    /// 对已打开的工作簿执行一次完整运行
    pub fn run_with_workbook(&mut self, workbook: &mut dyn Workbook) -> ImportResult<RunReport> {
        let mut results = ImportResultCollector::new();
        let mut trail = vec![RunState::Init];
        let delete_input = self.execute_phases(workbook, &mut results, &mut trail);
        self.finish(results, trail, delete_input)
    }

    /// prepare → check → 决策门 → import
    ///
    /// # 返回
    /// 是否需要删除源文件（由调用方在释放工作簿后执行）
    fn execute_phases(
        &mut self,
        workbook: &mut dyn Workbook,
        results: &mut ImportResultCollector,
        trail: &mut Vec<RunState>,
    ) -> bool {
        // 1. 准备
        if let Err(e) = self.importer.prepare() {
            error!(error = %e, "准备阶段失败，跳过校验");
            results.record(ImportStatus::GenericIoError, FILE_LEVEL_ROW, e.to_string());
        } else {
            trail.push(RunState::Prepared);

            // 2. 校验
            if self.config.run_mode.includes_check() {
                if let Err(e) = self.importer.check_file(workbook, results) {
                    fold_error(results, &e);
                }
                trail.push(RunState::Checked);
            }
        }

        // 3. 决策门
        if !results.has_errors() {
            if self.config.run_mode.includes_import() {
                let outcome = if self.config.is_update {
                    self.importer.update_file(workbook, results)
                } else {
                    self.importer.import_file(workbook, results)
                };
                if let Err(e) = outcome {
                    fold_error(results, &e);
                }
                trail.push(RunState::Imported);
            }
            false
        } else {
            warn!(issues = results.len(), "存在问题，不执行导入");
            self.config.delete_on_fail
        }
    }

    /// DONE: 按需删除源文件并写出结果文件
    fn finish(
        &self,
        results: ImportResultCollector,
        mut trail: Vec<RunState>,
        delete_input: bool,
    ) -> ImportResult<RunReport> {
        let input_deleted = delete_input && delete_source(&self.config.input);

        trail.push(RunState::Done);
        let results = results.into_results();
        let result_file = self.config.result_path();
        write_results(&result_file, &results)?;

        Ok(RunReport {
            results,
            state_trail: trail,
            input_deleted,
            result_file,
        })
    }
}

fn fold_error(results: &mut ImportResultCollector, err: &ImportError) {
    error!(error = %err, "运行中出现未处理错误");
    results.record(ImportStatus::GenericIoError, FILE_LEVEL_ROW, err.to_string());
}

fn delete_source(path: &Path) -> bool {
    match fs::remove_file(path) {
        Ok(()) => {
            info!(path = %path.display(), "已删除校验失败的源文件");
            true
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "删除源文件失败");
            false
        }
    }
}

/// 结果列表写为 JSON 数组
pub fn write_results(path: &Path, results: &[ImportResultEntry]) -> ImportResult<()> {
    let json = serde_json::to_string_pretty(results)?;
    fs::write(path, json).map_err(|e| {
        ImportError::ResultWriteError(format!("{}: {}", path.display(), e))
    })?;
    Ok(())
}
