// ==========================================
// DS 数据仓库装载 - 命令行入口
// ==========================================
// 用法:
//   ds-etl [config.json]
//
// 按装载计划依次装载;任一表致命失败即以非零状态退出
// ==========================================

use anyhow::Context;
use ds_etl::{logging, EtlConfig, EtlRunner};
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = EtlConfig::load(config_path.as_deref()).context("读取装载配置失败")?;

    logging::init_with_format(config.log_format);

    tracing::info!("==================================================");
    tracing::info!("{} {}", ds_etl::APP_NAME, ds_etl::VERSION);
    tracing::info!("数据库: {}", config.db_path.display());
    tracing::info!("源目录: {}", config.data_dir.display());
    tracing::info!("==================================================");

    let runner = EtlRunner::from_config(&config).context("初始化仓库数据库失败")?;
    let reports = runner.run(&config.plan).context("装载计划中止")?;

    for report in &reports {
        println!(
            "{}: rows={} skipped={} elapsed_ms={}",
            report.table_id,
            report.rows_processed,
            report.skipped.len(),
            report.elapsed_ms
        );
    }

    tracing::info!("装载结束");
    Ok(())
}
