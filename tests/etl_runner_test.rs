// ==========================================
// EtlRunner 端到端测试
// ==========================================
// 测试目标: 按配置执行标准计划,首个致命失败即停止
// ==========================================


use ds_etl::config::{standard_plan, EtlConfig};
use ds_etl::domain::LoadStatus;
use ds_etl::importer::{EtlRunner, ImportError};
use ds_etl::logging;
use ds_etl::repository::EtlLogRepository;
use test_helpers::{count_rows, open_shared, SourceDir};

fn config_for(source: &SourceDir) -> EtlConfig {
    EtlConfig {
        db_path: source.path().join("warehouse.db"),
        data_dir: source.path().to_path_buf(),
        ..EtlConfig::default()
    }
}

#[test]
fn test_standard_plan_end_to_end() {
    logging::init_test();

    let source = SourceDir::new();
    source.write_standard_set();
    let config = config_for(&source);

    let runner = EtlRunner::from_config(&config).expect("Failed to init runner");
    let reports = runner.run(&config.plan).expect("Plan should succeed");

    let processed: Vec<(String, usize)> = reports
        .iter()
        .map(|r| (r.table_id.clone(), r.rows_processed))
        .collect();
    assert_eq!(
        processed,
        vec![
            ("DS.FT_BALANCE_F".to_string(), 2),
            ("DS.FT_POSTING_F".to_string(), 3),
            ("DS.MD_ACCOUNT_D".to_string(), 2),
            ("DS.MD_CURRENCY_D".to_string(), 2),
            ("DS.MD_EXCHANGE_RATE_D".to_string(), 1),
            ("DS.MD_LEDGER_ACCOUNT_S".to_string(), 1),
        ]
    );

    let conn = open_shared(config.db_path.to_str().unwrap());
    let repo = EtlLogRepository::new(conn.clone());
    assert_eq!(repo.count_all().unwrap(), 12);
    for job in standard_plan() {
        let latest = repo.latest_by_process(&job.table_id).unwrap().unwrap();
        assert_eq!(latest.status, LoadStatus::Success, "{}", job.table_id);
    }
}

#[test]
fn test_rerun_is_stable() {
    logging::init_test();

    let source = SourceDir::new();
    source.write_standard_set();
    let config = config_for(&source);

    let runner = EtlRunner::from_config(&config).unwrap();
    runner.run(&config.plan).unwrap();
    runner.run(&config.plan).unwrap();

    let conn = open_shared(config.db_path.to_str().unwrap());
    assert_eq!(count_rows(&conn, "ft_balance_f"), 2);
    assert_eq!(count_rows(&conn, "ft_posting_f"), 3);
    assert_eq!(count_rows(&conn, "md_ledger_account_s"), 1);
}

#[test]
fn test_stops_at_first_fatal_failure() {
    logging::init_test();

    let source = SourceDir::new();
    source.write_standard_set();
    std::fs::remove_file(source.path().join("MD_ACCOUNT_D.csv")).unwrap();
    let config = config_for(&source);

    let runner = EtlRunner::from_config(&config).unwrap();
    let result = runner.run(&config.plan);
    assert!(matches!(result, Err(ImportError::FileNotFound(_))));

    let conn = open_shared(config.db_path.to_str().unwrap());
    let repo = EtlLogRepository::new(conn.clone());

    // 已完成的表保持提交
    assert_eq!(count_rows(&conn, "ft_balance_f"), 2);
    assert_eq!(count_rows(&conn, "ft_posting_f"), 3);

    let account = repo.latest_by_process("DS.MD_ACCOUNT_D").unwrap().unwrap();
    assert_eq!(account.status, LoadStatus::Failed);

    // 后续表未执行
    assert!(repo.latest_by_process("DS.MD_CURRENCY_D").unwrap().is_none());
    assert_eq!(count_rows(&conn, "md_currency_d"), 0);
}
