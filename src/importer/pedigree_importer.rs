// ==========================================
// 谱系导入器 - 谱系表格导入器实现
// ==========================================
// 工作表:
// - DATA:        子代 → 亲本 1/2 的谱系关系 + 谱系描述
// - DATA-STRING: 子代 → 谱系命名法的谱系定义 + 谱系字符串
// ==========================================
// 流程: 加载参考数据 → 表头/逐行校验 → 逐行新建记录
// ==========================================

use crate::domain::import_status::{ImportStatus, FILE_LEVEL_ROW};
use crate::domain::pedigree::{
    NewPedigree, NewPedigreeDefinition, NewPedigreeDescription, NewPedigreeNotation,
    RelationshipType,
};
use crate::importer::cell_reader::{all_cells_empty, cell_value};
use crate::importer::error::ImportResult;
use crate::importer::reference_cache::{description_key, PedigreeReferenceCache};
use crate::importer::result_collector::ImportResultCollector;
use crate::importer::sheet_importer_trait::SheetImporter;
use crate::importer::sheet_template::SheetTemplate;
use crate::importer::workbook::{SheetRow, Workbook};
use crate::repository::{PedigreeRepository, PedigreeStore};
use chrono::Utc;
use tracing::{debug, error, info, instrument, warn};

// ==========================================
// 模板常量
// ==========================================

pub const SHEET_DATA: &str = "DATA";
pub const SHEET_DATA_STRING: &str = "DATA-STRING";

pub const FIELD_ACCENUMB: &str = "ACCENUMB";
pub const FIELD_ACCENUMB_PARENT_1: &str = "Parent 1 ACCENUMB";
pub const FIELD_ACCENUMB_PARENT_2: &str = "Parent 2 ACCENUMB";
pub const FIELD_DESCRIPTION_PROCEDURE: &str = "Description of Crossing Procedure (if applicable)";
pub const FIELD_DESCRIPTION: &str = "Pedigree Description";
pub const FIELD_AUTHOR: &str = "Pedigree Author";

pub const FIELD_STRING: &str = "Pedigree string";
pub const FIELD_NOTATION: &str = "Pedigree Notation";

pub const DATA_TEMPLATE: SheetTemplate = SheetTemplate::new(
    SHEET_DATA,
    &[
        FIELD_ACCENUMB,
        FIELD_ACCENUMB_PARENT_1,
        FIELD_ACCENUMB_PARENT_2,
        FIELD_DESCRIPTION_PROCEDURE,
        FIELD_DESCRIPTION,
        FIELD_AUTHOR,
    ],
);

pub const DATA_STRING_TEMPLATE: SheetTemplate =
    SheetTemplate::new(SHEET_DATA_STRING, &[FIELD_ACCENUMB, FIELD_STRING, FIELD_NOTATION]);

/// 模板尚无关系类型列，统一写 Other
const DEFAULT_RELATIONSHIP_TYPE: RelationshipType = RelationshipType::Other;

// ==========================================
// 行结构
// ==========================================

/// DATA 工作表的一行
#[derive(Debug, Clone, PartialEq, Eq)]
struct DataRow {
    accenumb: Option<String>,
    parent_one: Option<String>,
    parent_two: Option<String>,
    procedure: Option<String>,
    description: Option<String>,
    author: Option<String>,
}

impl DataRow {
    fn from_row(row: &SheetRow) -> Self {
        Self {
            accenumb: cell_value(row, 0),
            parent_one: cell_value(row, 1),
            parent_two: cell_value(row, 2),
            procedure: cell_value(row, 3),
            description: cell_value(row, 4),
            author: cell_value(row, 5),
        }
    }
}

/// DATA-STRING 工作表的一行
#[derive(Debug, Clone, PartialEq, Eq)]
struct DataStringRow {
    accenumb: Option<String>,
    pedigree_string: Option<String>,
    notation: Option<String>,
}

impl DataStringRow {
    fn from_row(row: &SheetRow) -> Self {
        Self {
            accenumb: cell_value(row, 0),
            pedigree_string: cell_value(row, 1),
            notation: cell_value(row, 2),
        }
    }
}

/// 跳过表头与全空行后的数据行
fn data_rows(rows: &[SheetRow]) -> impl Iterator<Item = &SheetRow> {
    rows.iter().skip(1).filter(|row| !all_cells_empty(row))
}

/// 需要建立关系的亲本 id（两个亲本解析到同一 id 时只保留一个）
fn distinct_parents(parent_one: Option<i64>, parent_two: Option<i64>) -> Vec<i64> {
    let mut parents = Vec::with_capacity(2);
    if let Some(id) = parent_one {
        parents.push(id);
    }
    if let Some(id) = parent_two {
        if parent_one != Some(id) {
            parents.push(id);
        }
    }
    parents
}

/// 单张工作表的导入统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SheetImportStats {
    pub rows: usize,
    pub skipped_rows: usize,
    pub lookups_created: usize,
    pub records_created: usize,
}

// ==========================================
// PedigreeImporter
// ==========================================
pub struct PedigreeImporter<S: PedigreeStore> {
    store: S,
    cache: PedigreeReferenceCache,
    user_id: i64,
}

impl<S: PedigreeStore> PedigreeImporter<S> {
    pub fn new(store: S, user_id: i64) -> Self {
        Self {
            store,
            cache: PedigreeReferenceCache::default(),
            user_id,
        }
    }

    pub fn cache(&self) -> &PedigreeReferenceCache {
        &self.cache
    }

    // ===== 校验 =====

    fn check_data_sheet(&self, rows: &[SheetRow], results: &mut ImportResultCollector) {
        let Some(header) = rows.first() else {
            return;
        };
        DATA_TEMPLATE.check_headers(header, results);

        for row in data_rows(rows) {
            let record = DataRow::from_row(row);
            let row_index = row.row_index();

            if !self.cache.germplasm.contains(record.accenumb.as_deref()) {
                results.record(ImportStatus::GenericInvalidGermplasm, row_index, record.accenumb.clone());
            }
            for parent in [&record.parent_one, &record.parent_two] {
                if parent.is_some() && !self.cache.germplasm.contains(parent.as_deref()) {
                    results.record(ImportStatus::GenericInvalidGermplasm, row_index, parent.clone());
                }
            }
            // 缺描述时消息为杂交过程列名
            if record.description.is_none() {
                results.record(
                    ImportStatus::GenericMissingRequiredValue,
                    row_index,
                    FIELD_DESCRIPTION_PROCEDURE.to_string(),
                );
            }
        }
    }

    fn check_data_string_sheet(&self, rows: &[SheetRow], results: &mut ImportResultCollector) {
        let Some(header) = rows.first() else {
            return;
        };
        DATA_STRING_TEMPLATE.check_headers(header, results);

        for row in data_rows(rows) {
            let record = DataStringRow::from_row(row);
            let row_index = row.row_index();

            if !self.cache.germplasm.contains(record.accenumb.as_deref()) {
                results.record(ImportStatus::GenericInvalidGermplasm, row_index, record.accenumb.clone());
            }
            if record.pedigree_string.is_none() {
                results.record(
                    ImportStatus::GenericMissingRequiredValue,
                    row_index,
                    FIELD_STRING.to_string(),
                );
            }
            if record.notation.is_none() {
                results.record(
                    ImportStatus::GenericMissingRequiredValue,
                    row_index,
                    FIELD_NOTATION.to_string(),
                );
            }
        }
    }

    // ===== 导入 =====

    /// DATA: 谱系描述按需新建，再建立子代到各亲本的关系
    fn import_data_sheet(&mut self, rows: &[SheetRow]) -> ImportResult<SheetImportStats> {
        let repo = self.store.connect()?;
        let mut stats = SheetImportStats::default();

        for row in data_rows(rows) {
            stats.rows += 1;
            let record = DataRow::from_row(row);

            let Some(germplasm_id) = self.cache.germplasm.get(record.accenumb.as_deref()) else {
                debug!(row = row.row_number, accenumb = ?record.accenumb, "子代种质未解析，跳过");
                stats.skipped_rows += 1;
                continue;
            };

            let key = description_key(record.description.as_deref(), record.author.as_deref());
            let description_id = self.cache.descriptions.get_or_insert_with(key, || {
                stats.lookups_created += 1;
                repo.insert_description(&NewPedigreeDescription::new(
                    record.description.as_deref(),
                    record.author.as_deref(),
                ))
            })?;

            let parent_one_id = self.cache.germplasm.get(record.parent_one.as_deref());
            let parent_two_id = self.cache.germplasm.get(record.parent_two.as_deref());

            for parent_id in distinct_parents(parent_one_id, parent_two_id) {
                repo.insert_pedigree(&NewPedigree {
                    germinatebase_id: germplasm_id,
                    parent_id,
                    relationship_type: DEFAULT_RELATIONSHIP_TYPE,
                    relationship_description: record.procedure.clone(),
                    pedigreedescription_id: description_id,
                    created_on: Utc::now(),
                })?;
                stats.records_created += 1;
            }
        }

        Ok(stats)
    }

    /// DATA-STRING: 命名法按需新建，再建立谱系定义
    fn import_data_string_sheet(&mut self, rows: &[SheetRow]) -> ImportResult<SheetImportStats> {
        let repo = self.store.connect()?;
        let mut stats = SheetImportStats::default();

        for row in data_rows(rows) {
            stats.rows += 1;
            let record = DataStringRow::from_row(row);

            let Some(germplasm_id) = self.cache.germplasm.get(record.accenumb.as_deref()) else {
                debug!(row = row.row_number, accenumb = ?record.accenumb, "子代种质未解析，跳过");
                stats.skipped_rows += 1;
                continue;
            };

            let key = record.notation.clone().unwrap_or_default();
            let notation_id = self.cache.notations.get_or_insert_with(key, || {
                stats.lookups_created += 1;
                repo.insert_notation(&NewPedigreeNotation::new(record.notation.as_deref()))
            })?;

            repo.insert_definition(&NewPedigreeDefinition {
                germinatebase_id: germplasm_id,
                pedigreenotation_id: notation_id,
                definition: record.pedigree_string.clone(),
                created_on: Utc::now(),
            })?;
            stats.records_created += 1;
        }

        Ok(stats)
    }

    /// 读取导入用工作表；读取失败记录为 I/O 问题
    fn read_for_import(
        workbook: &mut dyn Workbook,
        sheet: &str,
        results: &mut ImportResultCollector,
    ) -> Option<Vec<SheetRow>> {
        match workbook.read_sheet(sheet) {
            Ok(rows) => rows,
            Err(e) => {
                error!(sheet, error = %e, "工作表读取失败");
                results.record(ImportStatus::GenericIoError, FILE_LEVEL_ROW, e.to_string());
                None
            }
        }
    }
}

impl<S: PedigreeStore> SheetImporter for PedigreeImporter<S> {
    fn name(&self) -> &'static str {
        "pedigree"
    }

    #[instrument(skip(self), fields(user_id = self.user_id))]
    fn prepare(&mut self) -> ImportResult<()> {
        let repo = self.store.connect()?;
        self.cache = PedigreeReferenceCache::load(&repo)?;
        Ok(())
    }

    #[instrument(skip_all)]
    fn check_file(
        &mut self,
        workbook: &mut dyn Workbook,
        results: &mut ImportResultCollector,
    ) -> ImportResult<()> {
        for template in [DATA_TEMPLATE, DATA_STRING_TEMPLATE] {
            match workbook.read_sheet(template.name) {
                Ok(None) => {
                    warn!(sheet = template.name, "缺少工作表");
                    results.record(
                        ImportStatus::GenericMissingExcelSheet,
                        FILE_LEVEL_ROW,
                        template.name.to_string(),
                    );
                }
                Ok(Some(rows)) => {
                    if template.name == SHEET_DATA {
                        self.check_data_sheet(&rows, results);
                    } else {
                        self.check_data_string_sheet(&rows, results);
                    }
                }
                Err(e) => {
                    error!(sheet = template.name, error = %e, "工作表读取失败");
                    results.record(ImportStatus::GenericIoError, FILE_LEVEL_ROW, e.to_string());
                }
            }
        }

        info!(issues = results.len(), "校验完成");
        Ok(())
    }

    #[instrument(skip_all, fields(user_id = self.user_id))]
    fn import_file(
        &mut self,
        workbook: &mut dyn Workbook,
        results: &mut ImportResultCollector,
    ) -> ImportResult<()> {
        if let Some(rows) = Self::read_for_import(workbook, SHEET_DATA, results) {
            match self.import_data_sheet(&rows) {
                Ok(stats) => info!(sheet = SHEET_DATA, ?stats, "工作表导入完成"),
                Err(e) => {
                    error!(sheet = SHEET_DATA, error = %e, "工作表导入失败");
                    results.record(ImportStatus::GenericIoError, FILE_LEVEL_ROW, e.to_string());
                }
            }
        }

        if let Some(rows) = Self::read_for_import(workbook, SHEET_DATA_STRING, results) {
            match self.import_data_string_sheet(&rows) {
                Ok(stats) => info!(sheet = SHEET_DATA_STRING, ?stats, "工作表导入完成"),
                Err(e) => {
                    error!(sheet = SHEET_DATA_STRING, error = %e, "工作表导入失败");
                    results.record(ImportStatus::GenericIoError, FILE_LEVEL_ROW, e.to_string());
                }
            }
        }

        Ok(())
    }
}
