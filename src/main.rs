// ==========================================
// 谱系数据导入器 - 命令行入口
// ==========================================
// 用法: pedigree-importer <DB_PATH> <INPUT> <IS_UPDATE> <DELETE_ON_FAIL> <RUN_MODE>
// 退出码: 结果文件写出即为 0；仅当结果文件无法写出时非 0
// ==========================================

use anyhow::Context;
use clap::{Parser, ValueEnum};
use pedigree_importer::config::{parse_flag, ImportRunConfig, RunMode};
use pedigree_importer::importer::{ImportRunner, PedigreeImporter};
use pedigree_importer::logging;
use pedigree_importer::repository::SqlitePedigreeStore;
use std::path::PathBuf;

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

/// 谱系表格导入（DATA / DATA-STRING 工作表）
#[derive(Debug, Parser)]
#[command(name = "pedigree-importer", version, about = "校验谱系表格并写入谱系关系")]
struct Cli {
    /// SQLite 数据库路径
    #[arg(value_name = "DB_PATH")]
    db_path: PathBuf,

    /// 输入表格路径 (.xlsx)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// 更新模式标记（"true" 为真，其余为假）
    #[arg(value_name = "IS_UPDATE")]
    is_update: String,

    /// 校验失败时删除源文件（"true" 为真，其余为假）
    #[arg(value_name = "DELETE_ON_FAIL")]
    delete_on_fail: String,

    /// 运行模式: CHECK | IMPORT | CHECK_AND_IMPORT（无法识别时按 CHECK）
    #[arg(value_name = "RUN_MODE")]
    run_mode: String,

    /// 操作用户 id
    #[arg(long, default_value_t = 0)]
    user_id: i64,

    /// 日志格式
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.log_format {
        LogFormat::Text => logging::init(),
        LogFormat::Json => logging::init_json(),
    }

    tracing::info!("==================================================");
    tracing::info!("{} v{}", pedigree_importer::APP_NAME, pedigree_importer::VERSION);
    tracing::info!("==================================================");

    let config = ImportRunConfig::new(&cli.db_path, &cli.input, RunMode::from_token(&cli.run_mode))
        .with_update(parse_flag(&cli.is_update))
        .with_delete_on_fail(parse_flag(&cli.delete_on_fail))
        .with_user_id(cli.user_id);

    let store = SqlitePedigreeStore::new(&config.db_path);
    let importer = PedigreeImporter::new(store, config.user_id);
    let mut runner = ImportRunner::new(importer, config);

    let report = runner.run().context("导入结果文件写出失败")?;

    tracing::info!(
        issues = report.results.len(),
        result_file = %report.result_file.display(),
        "运行完成"
    );
    Ok(())
}
