//! Возврат дебета (запись J).

use crate::error::Result;
use crate::transaction::layout::{parse_segment, SegmentFields, Tail};
use crate::transaction::{BaseTxn, TxnRecord};
use crate::types::RecordType;
use crate::validation::{Rule, ValidationErrors, Validator};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Дебет, возвращенный учреждением плательщика.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebitReturn {
    /// Общие поля.
    #[serde(flatten)]
    pub base: BaseTxn,
    /// Срок платежа.
    pub due_date: Option<NaiveDate>,
    /// Счет плательщика.
    pub payor_account_no: String,
    /// Имя плательщика.
    pub payor_name: String,
    /// Учреждение из исходного дебета.
    pub original_institution_id: String,
    /// Счет из исходного дебета.
    pub original_account_no: String,
    /// Номер трассировки исходной транзакции.
    pub original_item_trace_no: String,
}

impl DebitReturn {
    /// Создает возврат дебета из общей части и полей записи.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        base: BaseTxn,
        due_date: Option<NaiveDate>,
        payor_account_no: impl Into<String>,
        payor_name: impl Into<String>,
        original_institution_id: impl Into<String>,
        original_account_no: impl Into<String>,
        original_item_trace_no: impl Into<String>,
    ) -> Self {
        Self {
            base,
            due_date,
            payor_account_no: payor_account_no.into(),
            payor_name: payor_name.into(),
            original_institution_id: original_institution_id.into(),
            original_account_no: original_account_no.into(),
            original_item_trace_no: original_item_trace_no.into(),
        }
    }

    /// Разбирает сегмент из 240 символов.
    pub fn parse(data: &str) -> Result<Self> {
        let s = parse_segment(data, Tail::Referencing, "due_date")?;
        Ok(Self {
            base: s.base,
            due_date: s.date,
            payor_account_no: s.account_no,
            payor_name: s.name,
            original_institution_id: s.counterparty_institution_id,
            original_account_no: s.counterparty_account_no,
            original_item_trace_no: s.original_item_trace_no,
        })
    }
}

impl TxnRecord for DebitReturn {
    fn record_type(&self) -> RecordType {
        RecordType::DebitReturn
    }

    fn base(&self) -> &BaseTxn {
        &self.base
    }

    fn account_no(&self) -> &str {
        &self.payor_account_no
    }

    fn name(&self) -> &str {
        &self.payor_name
    }

    fn date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    fn original_item_trace_no(&self) -> Option<&str> {
        Some(&self.original_item_trace_no)
    }

    fn build(&self) -> Result<String> {
        SegmentFields {
            base: &self.base,
            date: self.due_date,
            account_no: &self.payor_account_no,
            name: &self.payor_name,
            name_field: "payor_name",
            counterparty_institution_id: &self.original_institution_id,
            counterparty_account_no: &self.original_account_no,
            original_item_trace_no: Some(&self.original_item_trace_no),
        }
        .build()
    }

    fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        let mut v = Validator::new();
        self.base.check(&mut v);
        v.check("due_date", self.due_date, &[Rule::Required])
            .check(
                "payor_account_no",
                &self.payor_account_no,
                &[Rule::Required, Rule::MaxLength(12), Rule::Numeric],
            )
            .check("payor_name", &self.payor_name, &[Rule::Required, Rule::MaxLength(30)])
            .check(
                "original_institution_id",
                &self.original_institution_id,
                &[Rule::Required, Rule::MaxLength(9), Rule::Numeric],
            )
            .check(
                "original_account_no",
                &self.original_account_no,
                &[Rule::Required, Rule::MaxLength(12), Rule::EftAlpha],
            )
            .check(
                "original_item_trace_no",
                &self.original_item_trace_no,
                &[Rule::Required, Rule::Numeric, Rule::MaxLength(22)],
            );
        v.finish()
    }
}
