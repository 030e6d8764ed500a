// ==========================================
// DS 数据仓库装载 - 目标表规格注册表
// ==========================================
// 职责: 表标识 → 表规格 的唯一数据源
// 覆盖: 2 张事实表 + 4 张维表
// ==========================================

use crate::domain::table_spec::{
    ColumnDefault, ColumnKind, ColumnSpec, ReloadStrategy, TableSpec,
};
use crate::importer::error::{ImportError, ImportResult};

use ColumnKind::{Date, Decimal, Integer, Text};

// ==========================================
// 事实表
// ==========================================

/// 账户余额
pub const FT_BALANCE_F: TableSpec = TableSpec {
    table_id: "DS.FT_BALANCE_F",
    target_table: "ft_balance_f",
    columns: &[
        ColumnSpec::required("ON_DATE", "on_date", Date),
        ColumnSpec::required("ACCOUNT_RK", "account_rk", Integer),
        ColumnSpec::optional("CURRENCY_RK", "currency_rk", Integer),
        ColumnSpec::optional("BALANCE_OUT", "balance_out", Decimal),
    ],
    conflict_key: &["on_date", "account_rk"],
    update_on_conflict: &["currency_rk", "balance_out"],
    reload_strategy: ReloadStrategy::Upsert,
};

/// 账户过账（无业务主键,全量重载）
pub const FT_POSTING_F: TableSpec = TableSpec {
    table_id: "DS.FT_POSTING_F",
    target_table: "ft_posting_f",
    columns: &[
        ColumnSpec::required("OPER_DATE", "oper_date", Date),
        ColumnSpec::required("CREDIT_ACCOUNT_RK", "credit_account_rk", Integer),
        ColumnSpec::required("DEBET_ACCOUNT_RK", "debit_account_rk", Integer),
        ColumnSpec::optional("CREDIT_AMOUNT", "credit_amount", Decimal)
            .with_default(ColumnDefault::Decimal(0.0)),
        ColumnSpec::optional("DEBET_AMOUNT", "debit_amount", Decimal)
            .with_default(ColumnDefault::Decimal(0.0)),
    ],
    conflict_key: &[],
    update_on_conflict: &[],
    reload_strategy: ReloadStrategy::TruncateAndAppend,
};

// ==========================================
// 维表
// ==========================================

/// 账户
pub const MD_ACCOUNT_D: TableSpec = TableSpec {
    table_id: "DS.MD_ACCOUNT_D",
    target_table: "md_account_d",
    columns: &[
        ColumnSpec::required("DATA_ACTUAL_DATE", "data_actual_date", Date),
        ColumnSpec::required("DATA_ACTUAL_END_DATE", "data_actual_end_date", Date),
        ColumnSpec::required("ACCOUNT_RK", "account_rk", Integer),
        ColumnSpec::required("ACCOUNT_NUMBER", "account_number", Text),
        ColumnSpec::required("CHAR_TYPE", "char_type", Text),
        ColumnSpec::required("CURRENCY_RK", "currency_rk", Integer),
        ColumnSpec::required("CURRENCY_CODE", "currency_code", Text),
    ],
    conflict_key: &["data_actual_date", "account_rk"],
    update_on_conflict: &[
        "data_actual_end_date",
        "account_number",
        "char_type",
        "currency_rk",
        "currency_code",
    ],
    reload_strategy: ReloadStrategy::Upsert,
};

/// 币种
pub const MD_CURRENCY_D: TableSpec = TableSpec {
    table_id: "DS.MD_CURRENCY_D",
    target_table: "md_currency_d",
    columns: &[
        ColumnSpec::required("CURRENCY_RK", "currency_rk", Integer),
        ColumnSpec::required("DATA_ACTUAL_DATE", "data_actual_date", Date),
        ColumnSpec::optional("DATA_ACTUAL_END_DATE", "data_actual_end_date", Date),
        ColumnSpec::optional("CURRENCY_CODE", "currency_code", Text),
        ColumnSpec::optional("CODE_ISO_CHAR", "code_iso_char", Text),
    ],
    conflict_key: &["currency_rk", "data_actual_date"],
    update_on_conflict: &["data_actual_end_date", "currency_code", "code_iso_char"],
    reload_strategy: ReloadStrategy::Upsert,
};

/// 汇率
pub const MD_EXCHANGE_RATE_D: TableSpec = TableSpec {
    table_id: "DS.MD_EXCHANGE_RATE_D",
    target_table: "md_exchange_rate_d",
    columns: &[
        ColumnSpec::required("DATA_ACTUAL_DATE", "data_actual_date", Date),
        ColumnSpec::optional("DATA_ACTUAL_END_DATE", "data_actual_end_date", Date),
        ColumnSpec::required("CURRENCY_RK", "currency_rk", Integer),
        ColumnSpec::optional("REDUCED_COURCE", "reduced_cource", Decimal),
        ColumnSpec::optional("CODE_ISO_NUM", "code_iso_num", Text),
    ],
    conflict_key: &["data_actual_date", "currency_rk"],
    update_on_conflict: &["data_actual_end_date", "reduced_cource", "code_iso_num"],
    reload_strategy: ReloadStrategy::Upsert,
};

/// 总账科目
pub const MD_LEDGER_ACCOUNT_S: TableSpec = TableSpec {
    table_id: "DS.MD_LEDGER_ACCOUNT_S",
    target_table: "md_ledger_account_s",
    columns: &[
        ColumnSpec::optional("CHAPTER", "chapter", Text),
        ColumnSpec::optional("CHAPTER_NAME", "chapter_name", Text),
        ColumnSpec::optional("SECTION_NUMBER", "section_number", Integer),
        ColumnSpec::optional("SECTION_NAME", "section_name", Text),
        ColumnSpec::optional("SUBSECTION_NAME", "subsection_name", Text),
        ColumnSpec::optional("LEDGER1_ACCOUNT", "ledger1_account", Integer),
        ColumnSpec::optional("LEDGER1_ACCOUNT_NAME", "ledger1_account_name", Text),
        ColumnSpec::required("LEDGER_ACCOUNT", "ledger_account", Integer),
        ColumnSpec::optional("LEDGER_ACCOUNT_NAME", "ledger_account_name", Text),
        ColumnSpec::optional("CHARACTERISTIC", "characteristic", Text),
        ColumnSpec::optional("IS_RESIDENT", "is_resident", Text),
        ColumnSpec::optional("IS_RESERVE", "is_reserve", Text),
        ColumnSpec::optional("IS_RESERVED", "is_reserved", Text),
        ColumnSpec::optional("IS_LOAN", "is_loan", Text),
        ColumnSpec::optional("IS_RESERVED_ASSETS", "is_reserved_assets", Text),
        ColumnSpec::optional("IS_OVERDUE", "is_overdue", Text),
        ColumnSpec::optional("IS_INTEREST", "is_interest", Text),
        ColumnSpec::optional("PAIR_ACCOUNT", "pair_account", Text),
        ColumnSpec::required("START_DATE", "start_date", Date),
        ColumnSpec::optional("END_DATE", "end_date", Date),
        ColumnSpec::optional("IS_RUB_ONLY", "is_rub_only", Text),
        ColumnSpec::optional("MIN_TERM", "min_term", Text),
        ColumnSpec::optional("MIN_TERM_MEASURE", "min_term_measure", Text),
        ColumnSpec::optional("MAX_TERM", "max_term", Text),
        ColumnSpec::optional("MAX_TERM_MEASURE", "max_term_measure", Text),
        ColumnSpec::optional(
            "LEDGER_ACC_FULL_NAME_TRANSLIT",
            "ledger_acc_full_name_translit",
            Text,
        ),
        ColumnSpec::optional("IS_REVALUATION", "is_revaluation", Text),
        ColumnSpec::optional("IS_CORRECT", "is_correct", Text),
    ],
    conflict_key: &["ledger_account", "start_date"],
    update_on_conflict: &[
        "chapter",
        "chapter_name",
        "section_number",
        "section_name",
        "subsection_name",
        "ledger1_account",
        "ledger1_account_name",
        "ledger_account_name",
        "characteristic",
        "is_resident",
        "is_reserve",
        "is_reserved",
        "is_loan",
        "is_reserved_assets",
        "is_overdue",
        "is_interest",
        "pair_account",
        "end_date",
        "is_rub_only",
        "min_term",
        "min_term_measure",
        "max_term",
        "max_term_measure",
        "ledger_acc_full_name_translit",
        "is_revaluation",
        "is_correct",
    ],
    // 科目表按冲突键更新即可覆盖全量重载场景,不清空历史版本
    reload_strategy: ReloadStrategy::Upsert,
};

// ==========================================
// TableSpecRegistry - 表规格注册表
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct TableSpecRegistry {
    specs: &'static [TableSpec],
}

/// DS 层全部目标表
pub static DS_TABLES: TableSpecRegistry = TableSpecRegistry {
    specs: &[
        FT_BALANCE_F,
        FT_POSTING_F,
        MD_ACCOUNT_D,
        MD_CURRENCY_D,
        MD_EXCHANGE_RATE_D,
        MD_LEDGER_ACCOUNT_S,
    ],
};

impl TableSpecRegistry {
    /// DS 层标准注册表
    pub fn standard() -> &'static TableSpecRegistry {
        &DS_TABLES
    }

    /// 按表标识查找规格（大小写不敏感）
    ///
    /// # 返回
    /// - Ok(&TableSpec): 唯一对应的规格
    /// - Err(ImportError::UnknownTable): 未注册
    pub fn lookup(&self, table_id: &str) -> ImportResult<&'static TableSpec> {
        let wanted = table_id.trim();
        self.specs
            .iter()
            .find(|spec| spec.table_id.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ImportError::UnknownTable(wanted.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static TableSpec> {
        self.specs.iter()
    }

    pub fn table_ids(&self) -> Vec<&'static str> {
        self.specs.iter().map(|spec| spec.table_id).collect()
    }

    /// 校验所有规格的不变量
    pub fn validate(&self) -> Result<(), String> {
        for spec in self.specs {
            spec.validate()?;
        }
        Ok(())
    }
}
